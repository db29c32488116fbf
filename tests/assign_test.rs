use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rgb_cube_remap::{pick, Assigner, Distance, Metric, PixelRecord, PoolOrder, RemapError, RgbColor, SubPool, Target};

fn random_colors(rng: &mut StdRng, n: usize) -> Vec<RgbColor> {
    (0..n).map(|_| RgbColor::new(rng.random(), rng.random(), rng.random())).collect()
}

fn contents(pool: &SubPool) -> Vec<RgbColor> {
    pool.window(pool.len()).collect()
}

/// Only the red channel matters; makes expected picks easy to read.
struct RedOnly;

impl Distance for RedOnly {
    fn distance(&self, target: &Target, candidate: RgbColor) -> f64 {
        (target.rgb.r as f64 - candidate.r as f64).abs()
    }
}

fn reds(values: &[u8]) -> Vec<RgbColor> {
    values.iter().map(|&r| RgbColor::new(r, 0, 0)).collect()
}

#[test]
fn chosen_candidate_is_no_worse_than_any_examined() {
    let mut rng = StdRng::seed_from_u64(7);
    for metric in [Metric::Rgb, Metric::Cie76, Metric::Cie94] {
        for _ in 0..50 {
            let pool = SubPool::from(random_colors(&mut rng, 300));
            let target = Target::new(RgbColor::new(rng.random(), rng.random(), rng.random()));
            let choice = pick(&pool, &target, 100, &metric).expect("pool is not empty");
            assert!(choice.position < 100);
            for (i, c) in pool.window(100).enumerate() {
                assert!(choice.distance <= metric.distance(&target, c), "{} candidate {} beats choice", metric, i);
            }
            let chosen = pool.window(100).nth(choice.position).expect("position inside window");
            assert_eq!(metric.distance(&target, chosen), choice.distance);
        }
    }
}

#[test]
fn window_never_reaches_past_its_bound() {
    // the perfect match sits just outside the window
    let pool = SubPool::from(reds(&[200, 150, 100, 50]));
    let target = Target::new(RgbColor::new(50, 0, 0));
    let choice = pick(&pool, &target, 3, &RedOnly).expect("non-empty");
    assert_eq!(choice.position, 2);
    assert_eq!(choice.distance, 50.0);
}

#[test]
fn short_pool_examines_everything_left() {
    let pool = SubPool::from(reds(&[200, 10]));
    let target = Target::new(RgbColor::new(0, 0, 0));
    let choice = pick(&pool, &target, 100, &RedOnly).expect("non-empty");
    assert_eq!(choice.position, 1);
}

#[test]
fn ties_keep_the_earliest_candidate() {
    let pool = SubPool::from(reds(&[90, 110, 90]));
    let target = Target::new(RgbColor::new(100, 0, 0));
    assert_eq!(pick(&pool, &target, 3, &RedOnly).expect("non-empty").position, 0);
}

#[test]
fn empty_pool_yields_no_choice() {
    let pool = SubPool::default();
    assert!(pick(&pool, &Target::new(RgbColor::default()), 10, &Metric::Cie76).is_none());
}

#[test]
fn preserve_order_only_removes_the_chosen_color() {
    let mut pool = SubPool::from(reds(&[10, 20, 30, 40, 50]));
    let target = Target::new(RgbColor::new(20, 0, 0));
    let (color, choice) = pool.take_best(&target, 3, PoolOrder::Preserve, &RedOnly).expect("non-empty");
    assert_eq!(color, RgbColor::new(20, 0, 0));
    assert_eq!(choice.position, 1);
    assert_eq!(contents(&pool), reds(&[10, 30, 40, 50]));
}

#[test]
fn rotate_order_moves_rejected_candidates_to_the_back() {
    let mut pool = SubPool::from(reds(&[10, 20, 30, 40, 50]));
    let target = Target::new(RgbColor::new(20, 0, 0));
    let (color, _) = pool.take_best(&target, 3, PoolOrder::Rotate, &RedOnly).expect("non-empty");
    assert_eq!(color, RgbColor::new(20, 0, 0));
    assert_eq!(contents(&pool), reds(&[40, 50, 10, 30]));
}

#[test]
fn single_pixel_gets_the_single_color() {
    let pixels = [PixelRecord::new(0, 0, RgbColor::new(1, 2, 3))];
    let pool = SubPool::from(vec![RgbColor::new(250, 0, 7)]);
    let out = Assigner::new(100, PoolOrder::Preserve, 0)
        .assign_partition(0, 0, &pixels, pool, 1, &Metric::Cie94)
        .expect("assignment succeeds");
    assert_eq!(out.writes, vec![(0, RgbColor::new(250, 0, 7))]);
}

#[test]
fn partition_drains_its_pool_and_writes_each_pixel_once() {
    let mut rng = StdRng::seed_from_u64(99);
    let width = 8;
    let pixels: Vec<PixelRecord> = (0..32)
        .map(|i| PixelRecord::new(i % width, i / width, RgbColor::new(rng.random(), rng.random(), rng.random())))
        .collect();
    let colors = random_colors(&mut rng, 32);
    for order in [PoolOrder::Preserve, PoolOrder::Rotate] {
        let out = Assigner::new(5, order, 4)
            .assign_partition(3, 64, &pixels, SubPool::from(colors.clone()), width, &Metric::Cie76)
            .expect("assignment succeeds");
        assert_eq!(out.worker, 3);
        let mut slots: Vec<usize> = out.writes.iter().map(|w| w.0).collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..32).collect::<Vec<_>>());

        let mut used: Vec<RgbColor> = out.writes.iter().map(|w| w.1).collect();
        let mut expected = colors.clone();
        used.sort_by_key(|c| c.to_index());
        expected.sort_by_key(|c| c.to_index());
        assert_eq!(used, expected);
        assert!(out.total_distance >= 0.0);
    }
}

#[test]
fn running_out_of_colors_is_an_error() {
    let pixels = [PixelRecord::new(0, 0, RgbColor::default()), PixelRecord::new(1, 0, RgbColor::default())];
    let pool = SubPool::from(vec![RgbColor::new(9, 9, 9)]);
    let err = Assigner::new(10, PoolOrder::Preserve, 0)
        .assign_partition(2, 0, &pixels, pool, 2, &Metric::Rgb)
        .expect_err("pool is too small");
    assert!(matches!(err, RemapError::PoolExhausted { worker: 2, pixel: 1 }), "{:?}", err);
}

#[test]
fn leftover_colors_are_an_error() {
    let pixels = [PixelRecord::new(0, 0, RgbColor::default())];
    let pool = SubPool::from(vec![RgbColor::new(9, 9, 9), RgbColor::new(1, 1, 1)]);
    let err = Assigner::new(10, PoolOrder::Preserve, 0)
        .assign_partition(0, 0, &pixels, pool, 1, &Metric::Rgb)
        .expect_err("pool is too large");
    assert!(matches!(err, RemapError::PoolNotDrained { worker: 0, left: 1 }), "{:?}", err);
}

#[test]
fn pool_order_names_parse() {
    assert_eq!("rotate".parse::<PoolOrder>().unwrap(), PoolOrder::Rotate);
    assert_eq!("Preserve".parse::<PoolOrder>().unwrap(), PoolOrder::Preserve);
    assert!("shuffle".parse::<PoolOrder>().is_err());
}
