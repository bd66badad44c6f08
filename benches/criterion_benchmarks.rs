use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rangecache_rs::config::IntervalLruCacheConfig;
use rangecache_rs::{fibonacci, sum_slice, IntervalLruCache, RangeKey, RangeSumCache};
use rangecache_rs::{MemoTable, SplayMemoTable};
use std::collections::HashMap;
use std::num::NonZeroUsize;

// Helper functions to create caches with the init pattern
fn make_cache<V>(cap: usize) -> IntervalLruCache<V> {
    let config = IntervalLruCacheConfig {
        capacity: NonZeroUsize::new(cap).unwrap(),
    };
    IntervalLruCache::init(config, None)
}

fn make_sums<T: Copy + std::iter::Sum<T>>(cap: usize) -> RangeSumCache<T> {
    let config = IntervalLruCacheConfig {
        capacity: NonZeroUsize::new(cap).unwrap(),
    };
    RangeSumCache::init(config, None)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    const CACHE_SIZE: usize = 1000;
    const ARRAY_LEN: usize = 10_000;

    let array: Vec<i64> = (0..ARRAY_LEN as i64).collect();

    let mut group = c.benchmark_group("Interval-LRU Operations");

    // Raw cache benchmarks
    {
        let mut cache = make_cache(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.put(RangeKey::new(i, i + 9).unwrap(), i as i64);
        }

        group.bench_function("get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    let key = RangeKey::new(i % CACHE_SIZE, (i % CACHE_SIZE) + 9).unwrap();
                    black_box(cache.get(&key));
                }
            });
        });

        group.bench_function("get miss", |b| {
            b.iter(|| {
                for i in 0..100 {
                    let key = RangeKey::new(i + CACHE_SIZE * 2, i + CACHE_SIZE * 2 + 9).unwrap();
                    black_box(cache.get(&key));
                }
            });
        });

        group.bench_function("put existing", |b| {
            b.iter(|| {
                for i in 0..100 {
                    let key = RangeKey::new(i % CACHE_SIZE, (i % CACHE_SIZE) + 9).unwrap();
                    black_box(cache.put(key, i as i64));
                }
            });
        });

        group.bench_function("invalidate covered position", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.invalidate(i % CACHE_SIZE));
                }
                // Repopulate so the next iteration invalidates live entries
                for i in 0..CACHE_SIZE {
                    cache.put(RangeKey::new(i, i + 9).unwrap(), i as i64);
                }
            });
        });
    }

    group.finish();

    let mut group = c.benchmark_group("Range-Sum Strategies");

    // Cached vs uncached range sums over a repeating query mix
    {
        let queries: Vec<(usize, usize)> = (0..100)
            .map(|i| {
                let start = (i * 97) % (ARRAY_LEN - 500);
                (start, start + 499)
            })
            .collect();

        group.bench_function("uncached sums", |b| {
            b.iter(|| {
                for &(start, end) in &queries {
                    black_box(sum_slice(&array, start, end).unwrap());
                }
            });
        });

        group.bench_function("cached sums, repeated queries", |b| {
            let mut sums = make_sums(256);
            b.iter(|| {
                for &(start, end) in &queries {
                    black_box(sums.range_sum(&array, start, end).unwrap());
                }
            });
        });

        group.bench_function("cached sums with interleaved updates", |b| {
            let mut sums = make_sums(256);
            let mut array = array.clone();
            b.iter(|| {
                for (i, &(start, end)) in queries.iter().enumerate() {
                    black_box(sums.range_sum(&array, start, end).unwrap());
                    if i % 10 == 0 {
                        sums.update(&mut array, (i * 31) % ARRAY_LEN, i as i64).unwrap();
                    }
                }
            });
        });
    }

    group.finish();

    let mut group = c.benchmark_group("Memoized Fibonacci");

    // Splay memo vs plain hash map on identical workloads
    {
        group.bench_function("splay memo, cold", |b| {
            b.iter(|| {
                let mut memo: SplayMemoTable<u64, u128> = SplayMemoTable::new();
                black_box(fibonacci(black_box(180), &mut memo).unwrap());
            });
        });

        group.bench_function("hash memo, cold", |b| {
            b.iter(|| {
                let mut memo: HashMap<u64, u128> = HashMap::new();
                black_box(fibonacci(black_box(180), &mut memo).unwrap());
            });
        });

        group.bench_function("splay memo, warm", |b| {
            let mut memo: SplayMemoTable<u64, u128> = SplayMemoTable::new();
            fibonacci(180, &mut memo).unwrap();
            b.iter(|| {
                for n in (0..=180u64).step_by(9) {
                    black_box(fibonacci(n, &mut memo).unwrap());
                }
            });
        });

        group.bench_function("hash memo, warm", |b| {
            let mut memo: HashMap<u64, u128> = HashMap::new();
            fibonacci(180, &mut memo).unwrap();
            b.iter(|| {
                for n in (0..=180u64).step_by(9) {
                    black_box(fibonacci(n, &mut memo).unwrap());
                }
            });
        });

        group.bench_function("splay search, skewed keys", |b| {
            let mut memo: SplayMemoTable<u64, u128> = SplayMemoTable::new();
            fibonacci(180, &mut memo).unwrap();
            b.iter(|| {
                // Hot keys dominate; the splay keeps them near the root
                for i in 0..100u64 {
                    let key = if i % 4 == 0 { 7 + i % 3 } else { 150 };
                    black_box(memo.lookup(&key));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
