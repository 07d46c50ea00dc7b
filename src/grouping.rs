//! Clustering of raw detections into representative rectangles.
//!
//! Two rectangles are *similar* when every edge moved by at most
//! `confluence · (min(w₁, w₂) + min(h₁, h₂))`. Similar rectangles form a class;
//! each class is reduced to its mean rectangle carrying the class size as
//! `neighbors`. Classes smaller than `min_neighbors` are dropped, then any
//! survivor nested inside a strictly larger survivor (grown by
//! `containment_tolerance` of its size on every side) is removed. Output is
//! sorted by descending `neighbors`, ties keeping class order.
//!
//! Class order is the order of each class's first member in the input.
use crate::types::Rectangle;
use log::debug;
use serde::{Deserialize, Serialize};

/// How similar rectangles are partitioned into classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingStrategy {
    /// Transitive closure of the similarity relation. Independent of input
    /// order.
    #[default]
    ConnectedComponents,
    /// Each rectangle joins the class of the first earlier rectangle it is
    /// similar to, or opens a new class. Depends on input order.
    Sequential,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingOptions {
    pub confluence: f32,
    pub strategy: GroupingStrategy,
    /// Relative growth of the containing rectangle in the nesting filter.
    pub containment_tolerance: f32,
}

impl Default for GroupingOptions {
    fn default() -> Self {
        Self {
            confluence: 1.0,
            strategy: GroupingStrategy::default(),
            containment_tolerance: 0.2,
        }
    }
}

/// Group `rects` into representative rectangles.
pub fn group_rectangles(
    rects: &[Rectangle],
    min_neighbors: usize,
    options: &GroupingOptions,
) -> Vec<Rectangle> {
    let labels = match options.strategy {
        GroupingStrategy::ConnectedComponents => component_labels(rects, options.confluence),
        GroupingStrategy::Sequential => sequential_labels(rects, options.confluence),
    };
    let classes = labels.iter().copied().max().map_or(0, |m| m + 1);

    let mut acc = vec![[0.0f64; 4]; classes];
    let mut counts = vec![0usize; classes];
    for (r, &label) in rects.iter().zip(labels.iter()) {
        let a = &mut acc[label];
        a[0] += r.x as f64;
        a[1] += r.y as f64;
        a[2] += r.width as f64;
        a[3] += r.height as f64;
        counts[label] += 1;
    }

    let groups: Vec<Rectangle> = acc
        .iter()
        .zip(counts.iter())
        .filter(|&(_, &n)| n > 0 && n >= min_neighbors)
        .map(|(a, &n)| {
            let n_f = n as f64;
            Rectangle {
                x: (a[0] / n_f) as f32,
                y: (a[1] / n_f) as f32,
                width: (a[2] / n_f) as f32,
                height: (a[3] / n_f) as f32,
                neighbors: n as u32,
            }
        })
        .collect();

    let mut kept: Vec<Rectangle> = groups
        .iter()
        .enumerate()
        .filter(|(i, r)| {
            !groups.iter().enumerate().any(|(j, outer)| {
                *i != j && outer.area() > r.area() && nested(r, outer, options.containment_tolerance)
            })
        })
        .map(|(_, r)| *r)
        .collect();
    kept.sort_by(|a, b| b.neighbors.cmp(&a.neighbors));

    debug!(
        "grouped {} rectangles into {} classes, {} above {} neighbors, {} after nesting filter",
        rects.len(),
        classes,
        groups.len(),
        min_neighbors,
        kept.len()
    );
    kept
}

/// Whether `a` and `b` fall in the same class.
pub fn similar(a: &Rectangle, b: &Rectangle, confluence: f32) -> bool {
    let delta = confluence * (a.width.min(b.width) + a.height.min(b.height));
    (a.x - b.x).abs() <= delta
        && (a.y - b.y).abs() <= delta
        && (a.right() - b.right()).abs() <= delta
        && (a.bottom() - b.bottom()).abs() <= delta
}

fn nested(inner: &Rectangle, outer: &Rectangle, tolerance: f32) -> bool {
    let dx = outer.width * tolerance;
    let dy = outer.height * tolerance;
    inner.x >= outer.x - dx
        && inner.y >= outer.y - dy
        && inner.right() <= outer.right() + dx
        && inner.bottom() <= outer.bottom() + dy
}

fn sequential_labels(rects: &[Rectangle], confluence: f32) -> Vec<usize> {
    let mut labels: Vec<usize> = Vec::with_capacity(rects.len());
    let mut classes = 0;
    for (i, r) in rects.iter().enumerate() {
        let label = match (0..i).find(|&j| similar(r, &rects[j], confluence)) {
            Some(j) => labels[j],
            None => {
                classes += 1;
                classes - 1
            }
        };
        labels.push(label);
    }
    labels
}

fn component_labels(rects: &[Rectangle], confluence: f32) -> Vec<usize> {
    let mut sets = DisjointSet::new(rects.len());
    for i in 0..rects.len() {
        for j in 0..i {
            if similar(&rects[i], &rects[j], confluence) {
                sets.union(i, j);
            }
        }
    }

    // Number the components by their first member.
    let mut label_of_root = vec![usize::MAX; rects.len()];
    let mut next = 0;
    (0..rects.len())
        .map(|i| {
            let root = sets.find(i);
            if label_of_root[root] == usize::MAX {
                label_of_root[root] = next;
                next += 1;
            }
            label_of_root[root]
        })
        .collect()
}

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
