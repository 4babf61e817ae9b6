use std::collections::VecDeque;

use bitmask_core::{BitGrid, GridSize, Point, Rect};

use crate::error::OpsError;
use crate::union_find::UnionFind;

/// Pixel adjacency used to decide which set bits belong to the same region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// North, east, south and west neighbours.
    Four,
    /// The four edge neighbours plus the diagonals.
    #[default]
    Eight,
}

impl Connectivity {
    /// Offsets of the neighbours of a pixel.
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Connectivity::Four => &[(1, 0), (0, 1), (-1, 0), (0, -1)],
            Connectivity::Eight => &[
                (1, 0),
                (1, 1),
                (0, 1),
                (-1, 1),
                (-1, 0),
                (-1, -1),
                (0, -1),
                (1, -1),
            ],
        }
    }

    /// Offsets of the neighbours visited before a pixel in a row-major scan.
    fn preceding(self) -> &'static [(i32, i32)] {
        match self {
            Connectivity::Four => &[(-1, 0), (0, -1)],
            Connectivity::Eight => &[(-1, 0), (-1, -1), (0, -1), (1, -1)],
        }
    }
}

/// Options for [`find_components`].
///
/// # Examples
///
/// ```
/// use bitmask_ops::label::{Connectivity, LabelOptions};
///
/// let options = LabelOptions::default()
///     .with_connectivity(Connectivity::Four)
///     .with_min_size(3);
///
/// assert_eq!(options.connectivity, Connectivity::Four);
/// assert_eq!(options.min_size, 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelOptions {
    /// Adjacency between set bits.
    pub connectivity: Connectivity,
    /// Components with fewer bits are dropped.
    pub min_size: usize,
}

impl LabelOptions {
    /// Set the adjacency between set bits.
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Set the smallest component size kept.
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }
}

/// A maximal region of connected set bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// 1-based position of the component in the labeling result.
    pub label: u32,
    /// Number of member bits.
    pub size: usize,
    /// The first member in row-major order.
    pub seed: Point,
    /// Tight bounding rectangle of the members.
    pub bounds: Rect,
    /// Members cropped to `bounds`: bit `(x, y)` is source pixel
    /// `(bounds.x + x, bounds.y + y)`.
    pub mask: BitGrid,
    /// Size of the labelled grid.
    pub grid_size: GridSize,
}

impl Component {
    /// Member coordinates in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let origin = Point::new(self.bounds.x, self.bounds.y);
        self.mask.iter_ones().map(move |p| p + origin)
    }

    /// Returns true if `p` belongs to the component.
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p) && self.mask.get(p.x - self.bounds.x, p.y - self.bounds.y)
    }

    /// The component placed in a grid of the labelled grid's size.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitmask_core::BitGrid;
    /// use bitmask_ops::label::{connected_components, Connectivity};
    ///
    /// let grid = BitGrid::from_slice(4, 1, &[0, 0, 1, 1]).unwrap();
    /// let components = connected_components(&grid, Connectivity::Four);
    ///
    /// assert_eq!(components[0].mask.width(), 2);
    /// assert_eq!(components[0].to_grid(), grid);
    /// ```
    pub fn to_grid(&self) -> BitGrid {
        let mut grid = BitGrid::from_size(self.grid_size);
        grid.draw(&self.mask, self.bounds.x, self.bounds.y);
        grid
    }
}

/// Find the connected components of the set bits of a grid.
///
/// Components are sorted by decreasing size. Ties keep the component whose
/// first member in row-major order comes first.
///
/// # Arguments
///
/// * `src` - The grid to analyse.
/// * `connectivity` - Adjacency between set bits.
///
/// # Returns
///
/// The components, labelled `1..=n` in output order. A clear grid yields none.
pub fn connected_components(src: &BitGrid, connectivity: Connectivity) -> Vec<Component> {
    find_components(src, &LabelOptions::default().with_connectivity(connectivity))
}

/// Find the connected components of the set bits of a grid with options.
///
/// Each component is flood filled from the first unlabelled set bit of a
/// row-major scan, so the membership and order of the result do not depend on
/// how a single region is traversed.
pub fn find_components(src: &BitGrid, options: &LabelOptions) -> Vec<Component> {
    let mut labeled = BitGrid::from_size(src.size());
    let mut queue = VecDeque::new();
    let mut members = Vec::new();
    let mut components = Vec::new();

    for seed in src.iter_ones() {
        if labeled.get(seed.x, seed.y) {
            continue;
        }
        components.push(flood_fill(
            src,
            &mut labeled,
            &mut queue,
            &mut members,
            seed,
            options.connectivity,
        ));
    }

    // stable: equal sizes keep their seed order
    components.sort_by(|a, b| b.size.cmp(&a.size));
    components.retain(|c| c.size >= options.min_size);
    for (i, component) in components.iter_mut().enumerate() {
        component.label = i as u32 + 1;
    }

    log::debug!(
        "found {} components ({:?}, min size {})",
        components.len(),
        options.connectivity,
        options.min_size
    );

    components
}

/// The component containing `(x, y)` as a grid of the source size.
///
/// The result is clear when the bit at `(x, y)` is unset or out of range.
pub fn component_at(src: &BitGrid, x: i32, y: i32, connectivity: Connectivity) -> BitGrid {
    if !src.get(x, y) {
        return BitGrid::from_size(src.size());
    }
    let mut labeled = BitGrid::from_size(src.size());
    flood_fill(
        src,
        &mut labeled,
        &mut VecDeque::new(),
        &mut Vec::new(),
        Point::new(x, y),
        connectivity,
    )
    .to_grid()
}

/// Bounding rectangles of the connected components, in component order.
pub fn bounding_rects(src: &BitGrid, connectivity: Connectivity) -> Vec<Rect> {
    connected_components(src, connectivity)
        .into_iter()
        .map(|c| c.bounds)
        .collect()
}

fn flood_fill(
    src: &BitGrid,
    labeled: &mut BitGrid,
    queue: &mut VecDeque<Point>,
    members: &mut Vec<Point>,
    seed: Point,
    connectivity: Connectivity,
) -> Component {
    members.clear();
    let mut bounds = Rect::from_point(seed);

    labeled.set(seed.x, seed.y, true);
    queue.push_back(seed);

    while let Some(p) = queue.pop_front() {
        members.push(p);
        bounds.include(p);

        for &(dx, dy) in connectivity.offsets() {
            let (nx, ny) = (p.x + dx, p.y + dy);
            if src.get(nx, ny) && !labeled.get(nx, ny) {
                labeled.set(nx, ny, true);
                queue.push_back(Point::new(nx, ny));
            }
        }
    }

    // the mask only spans the bounds, never the whole source
    let mut mask = BitGrid::from_size(GridSize {
        width: bounds.width as usize,
        height: bounds.height as usize,
    });
    for p in members.iter() {
        mask.set(p.x - bounds.x, p.y - bounds.y, true);
    }

    Component {
        label: 0,
        size: members.len(),
        seed,
        bounds,
        mask,
        grid_size: src.size(),
    }
}

/// Per-pixel component labels of a grid.
///
/// Label `0` is background; label `k` is the `k`-th component returned by
/// [`connected_components`] for the same grid and connectivity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    size: GridSize,
    labels: Vec<u32>,
    num_labels: usize,
}

impl LabelMap {
    /// Size of the labelled grid.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Number of components.
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    /// Label at `(x, y)`, `0` when out of range.
    pub fn get(&self, x: i32, y: i32) -> u32 {
        if x < 0 || y < 0 || x as usize >= self.size.width || y as usize >= self.size.height {
            return 0;
        }
        self.labels[y as usize * self.size.width + x as usize]
    }

    /// Row-major labels.
    pub fn as_slice(&self) -> &[u32] {
        &self.labels
    }

    /// Grid of the pixels carrying `label`.
    pub fn mask(&self, label: u32) -> Result<BitGrid, OpsError> {
        let width = self.size.width as i32;
        let height = self.size.height as i32;
        let mask = BitGrid::from_fn(width, height, |x, y| label != 0 && self.get(x, y) == label)?;
        Ok(mask)
    }
}

/// Label every set bit with its component using a two-pass union-find scan.
///
/// # Examples
///
/// ```
/// use bitmask_core::BitGrid;
/// use bitmask_ops::label::{label_map, Connectivity};
///
/// let grid = BitGrid::from_slice(4, 1, &[1, 0, 1, 1]).unwrap();
/// let labels = label_map(&grid, Connectivity::Four);
///
/// assert_eq!(labels.num_labels(), 2);
/// assert_eq!(labels.as_slice(), &[2, 0, 1, 1]);
/// ```
pub fn label_map(src: &BitGrid, connectivity: Connectivity) -> LabelMap {
    let size = src.size();
    let index = |p: Point| p.y as usize * size.width + p.x as usize;

    // first pass: provisional ids, 0 is background
    let mut provisional = vec![0usize; size.area()];
    let mut uf = UnionFind::default();
    for p in src.iter_ones() {
        let mut current = None;
        for &(dx, dy) in connectivity.preceding() {
            let q = Point::new(p.x + dx, p.y + dy);
            if !src.get(q.x, q.y) {
                continue;
            }
            let id = provisional[index(q)] - 1;
            current = Some(match current {
                None => id,
                Some(c) => uf.union(c, id),
            });
        }
        let id = current.unwrap_or_else(|| uf.make_set());
        provisional[index(p)] = id + 1;
    }

    // order the roots the same way the component list is ordered
    let mut roots = Vec::new();
    let mut seen = vec![false; uf.len()];
    for p in src.iter_ones() {
        let root = uf.find(provisional[index(p)] - 1);
        if !seen[root] {
            seen[root] = true;
            roots.push((root, uf.set_size(root)));
        }
    }
    roots.sort_by(|a, b| b.1.cmp(&a.1));

    let mut final_label = vec![0u32; uf.len()];
    for (i, &(root, _)) in roots.iter().enumerate() {
        final_label[root] = i as u32 + 1;
    }

    let labels = provisional
        .iter()
        .map(|&id| match id {
            0 => 0,
            id => final_label[uf.find(id - 1)],
        })
        .collect();

    log::debug!("labelled {} regions ({:?})", roots.len(), connectivity);

    LabelMap {
        size,
        labels,
        num_labels: roots.len(),
    }
}
