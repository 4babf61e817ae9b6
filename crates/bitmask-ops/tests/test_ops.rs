use bitmask_core::{BitGrid, Point};
use bitmask_ops::{
    contour,
    label::{self, Connectivity, LabelOptions},
    morphology::{self, BorderMode, Kernel, KernelShape},
    transform, OpsError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_grid(rng: &mut StdRng, width: i32, height: i32, density: f64) -> BitGrid {
    BitGrid::from_fn(width, height, |_, _| rng.random_bool(density)).unwrap()
}

fn is_subset(a: &BitGrid, b: &BitGrid) -> bool {
    a.iter_ones().all(|p| b.get(p.x, p.y))
}

#[test]
fn test_component_sizes_sum_to_count() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let (w, h) = (rng.random_range(0..90), rng.random_range(0..30));
        let grid = random_grid(&mut rng, w, h, 0.45);
        for connectivity in [Connectivity::Four, Connectivity::Eight] {
            let components = label::connected_components(&grid, connectivity);
            let total: usize = components.iter().map(|c| c.size).sum();
            assert_eq!(total, grid.count());

            // components partition the set bits
            let mut union = BitGrid::from_size(grid.size());
            for c in &components {
                assert_eq!(c.mask.count(), c.size);
                assert_eq!(c.mask.width(), c.bounds.width as usize);
                assert_eq!(c.mask.height(), c.bounds.height as usize);
                assert!(!union.overlap_exists(&c.mask, c.bounds.x, c.bounds.y));
                union.draw(&c.mask, c.bounds.x, c.bounds.y);
            }
            assert_eq!(union, grid);

            assert!(components.windows(2).all(|w| w[0].size >= w[1].size));
        }
    }
}

#[test]
fn test_label_map_matches_components() -> Result<(), OpsError> {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..30 {
        let (w, h) = (rng.random_range(1..70), rng.random_range(1..25));
        let grid = random_grid(&mut rng, w, h, 0.5);
        for connectivity in [Connectivity::Four, Connectivity::Eight] {
            let components = label::connected_components(&grid, connectivity);
            let labels = label::label_map(&grid, connectivity);
            assert_eq!(labels.num_labels(), components.len());
            for c in &components {
                assert_eq!(labels.mask(c.label)?, c.to_grid());
            }
            assert!(labels.mask(0)?.is_clear());
        }
    }
    Ok(())
}

#[test]
fn test_min_size_filter() {
    let mut rng = StdRng::seed_from_u64(5);
    let grid = random_grid(&mut rng, 64, 32, 0.3);
    let options = LabelOptions::default().with_min_size(4);
    let components = label::find_components(&grid, &options);

    assert!(components.iter().all(|c| c.size >= 4));
    let labels: Vec<u32> = components.iter().map(|c| c.label).collect();
    let expected: Vec<u32> = (1..=components.len() as u32).collect();
    assert_eq!(labels, expected);
}

#[test]
fn test_square_block_scenario() -> Result<(), OpsError> {
    let mut grid = BitGrid::new(4, 4)?;
    for (x, y) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
        grid.set(x, y, true);
    }
    assert_eq!(grid.count(), 4);

    let components = label::connected_components(&grid, Connectivity::Four);
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].size, 4);
    assert_eq!(components[0].label, 1);

    let outline = contour::trace_outline(&components[0].to_grid())?;
    assert_eq!(
        outline,
        vec![
            Point::new(1, 1),
            Point::new(2, 1),
            Point::new(2, 2),
            Point::new(1, 2),
        ]
    );
    Ok(())
}

#[test]
fn test_outline_walks_component_boundary() -> Result<(), OpsError> {
    let mut rng = StdRng::seed_from_u64(19);
    let grid = random_grid(&mut rng, 48, 24, 0.55);
    for c in label::connected_components(&grid, Connectivity::Eight) {
        let outline = contour::trace_outline(&c.to_grid())?;
        assert_eq!(outline[0], c.seed);
        assert!(outline.iter().all(|&p| c.contains(p)));
        if c.size == 1 {
            assert_eq!(outline.len(), 1);
            continue;
        }

        let mut closed = outline.clone();
        closed.push(outline[0]);
        for pair in closed.windows(2) {
            let d = pair[1] - pair[0];
            assert!(d.x.abs() <= 1 && d.y.abs() <= 1 && d != Point::new(0, 0));
        }
    }
    Ok(())
}

#[test]
fn test_closing_keeps_interior_grid() -> Result<(), OpsError> {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..20 {
        // nothing on the outermost ring, so clipping never bites
        let grid = BitGrid::from_fn(40, 20, |x, y| {
            (1..39).contains(&x) && (1..19).contains(&y) && rng.random_bool(0.3)
        })?;
        let closed = morphology::erode(&morphology::dilate(&grid));
        assert!(is_subset(&grid, &closed));
    }
    Ok(())
}

#[test]
fn test_closing_with_ignored_border() -> Result<(), OpsError> {
    let mut rng = StdRng::seed_from_u64(29);
    let kernels = [
        Kernel::new(KernelShape::Box { size: 3 })?,
        Kernel::new(KernelShape::Cross { size: 5 })?,
    ];
    for _ in 0..20 {
        let grid = random_grid(&mut rng, 37, 17, 0.4);
        for kernel in &kernels {
            let closed = morphology::close(&grid, kernel, BorderMode::Ignore);
            assert!(is_subset(&grid, &closed));
        }
    }
    Ok(())
}

#[test]
fn test_convolve_agrees_with_morphology() -> Result<(), OpsError> {
    let mut rng = StdRng::seed_from_u64(31);
    let kernels = [
        Kernel::new(KernelShape::Box { size: 3 })?,
        Kernel::new(KernelShape::Ellipse {
            width: 5,
            height: 3,
        })?,
        Kernel::from_mask(BitGrid::from_slice(3, 2, &[1, 0, 1, 0, 1, 1])?, Point::new(0, 1))?,
    ];
    for _ in 0..10 {
        let grid = random_grid(&mut rng, 30, 12, 0.6);
        for kernel in &kernels {
            let anchor = kernel.anchor();
            let counts = morphology::convolve(&grid, kernel.mask(), anchor.x, anchor.y);
            let full = kernel.mask().count() as u32;

            assert_eq!(counts.threshold(1), morphology::dilate_with_kernel(&grid, kernel));
            assert_eq!(counts.threshold(full), morphology::erode_with_kernel(&grid, kernel));
            assert!(counts.max() <= full);
        }
    }
    Ok(())
}

#[test]
fn test_component_at_matches_labelling() {
    let mut rng = StdRng::seed_from_u64(37);
    let grid = random_grid(&mut rng, 32, 16, 0.5);
    for c in label::connected_components(&grid, Connectivity::Four) {
        let mask = label::component_at(&grid, c.seed.x, c.seed.y, Connectivity::Four);
        assert_eq!(mask, c.to_grid());
        assert_eq!(mask.bounding_rect(), Some(c.bounds));
    }
}

#[test]
fn test_scale_up_then_down() -> Result<(), OpsError> {
    let mut rng = StdRng::seed_from_u64(41);
    let grid = random_grid(&mut rng, 21, 9, 0.5);
    let big = transform::scale(&grid, 42, 18)?;
    assert_eq!(big.count(), 4 * grid.count());
    assert_eq!(transform::scale(&big, 21, 9)?, grid);
    Ok(())
}
