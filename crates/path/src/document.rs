//! A collection of paths and handles to their points.
//!
//! Segments do not know which path they belong to. Point-level editing goes through a
//! [`VectorHandle`], which names a path of a [`Document`] by [`PathId`] together with a
//! segment and a point of that segment.

use crate::geom::Point;
use crate::path::Path2D;
use crate::PathError;

use std::collections::BTreeMap;
use std::fmt;

/// ID of a path in a [`Document`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct PathId(pub u32);

impl PathId {
    pub const INVALID: Self = PathId(u32::MAX);
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PathId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Refers to one point of one segment of a path in a [`Document`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VectorHandle {
    pub path: PathId,
    /// Index in the path's segment list.
    pub segment: usize,
    /// Index in the segment's points.
    pub vector: usize,
}

/// Owns the paths of a drawing.
#[derive(Clone, Debug, Default)]
pub struct Document {
    paths: BTreeMap<PathId, Path2D>,
    next_id: u32,
}

impl Document {
    pub fn new() -> Self {
        Document {
            paths: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Adds a path and returns its id. Ids are never reused.
    pub fn add(&mut self, path: Path2D) -> PathId {
        let id = PathId(self.next_id);
        self.next_id += 1;
        self.paths.insert(id, path);

        id
    }

    pub fn get(&self, id: PathId) -> Option<&Path2D> {
        self.paths.get(&id)
    }

    pub fn get_mut(&mut self, id: PathId) -> Option<&mut Path2D> {
        self.paths.get_mut(&id)
    }

    /// Removes a path. Handles into it stop resolving.
    pub fn remove(&mut self, id: PathId) -> Option<Path2D> {
        self.paths.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterates over the paths in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (PathId, &Path2D)> {
        self.paths.iter().map(|(id, path)| (*id, path))
    }

    /// The current position of the point a handle refers to.
    pub fn resolve(&self, handle: &VectorHandle) -> Option<Point> {
        let position = self
            .paths
            .get(&handle.path)
            .and_then(|path| path.segment(handle.segment))
            .and_then(|segment| segment.coords.get(handle.vector).copied());

        if position.is_none() {
            log::warn!("unresolved vector handle {:?}", handle);
        }

        position
    }

    /// Moves the point a handle refers to.
    ///
    /// See [`Path2D::set_vector_position`].
    pub fn set_vector_position(
        &mut self,
        handle: &VectorHandle,
        value: Point,
    ) -> Result<(), PathError> {
        let path = match self.paths.get_mut(&handle.path) {
            Some(path) => path,
            None => {
                log::warn!("vector handle {:?} refers to a removed path", handle);
                return Err(PathError::UnknownPath(handle.path));
            }
        };

        path.set_vector_position(handle.segment, handle.vector, value)
    }

    /// Finds the segment point closest to `position`, at most `tolerance` away.
    ///
    /// On ties, the point of the path added first wins, then the lowest segment and
    /// point indices.
    pub fn pick(&self, position: Point, tolerance: f64) -> Option<VectorHandle> {
        let max_sq = tolerance * tolerance;
        let mut best: Option<(f64, VectorHandle)> = None;
        for (id, path) in &self.paths {
            for segment in path.segments() {
                for (vector, p) in segment.coords.iter().enumerate() {
                    let d = (*p - position).square_length();
                    if d > max_sq || best.map_or(false, |(best_d, _)| d >= best_d) {
                        continue;
                    }
                    best = Some((
                        d,
                        VectorHandle {
                            path: *id,
                            segment: segment.index,
                            vector,
                        },
                    ));
                }
            }
        }

        best.map(|(_, handle)| handle)
    }
}

#[cfg(test)]
use crate::geom::point;

#[cfg(test)]
fn triangle() -> Path2D {
    let mut path = Path2D::new();
    path.move_to(point(0.0, 0.0));
    path.line_to(point(10.0, 0.0)).unwrap();
    path.line_to(point(5.0, 8.0)).unwrap();
    path.close_path().unwrap();
    path
}

#[test]
fn add_and_remove() {
    let mut doc = Document::new();
    let a = doc.add(triangle());
    let b = doc.add(Path2D::new());
    assert_ne!(a, b);
    assert_eq!(doc.len(), 2);

    assert!(doc.remove(a).is_some());
    assert!(doc.get(a).is_none());
    assert!(doc.get(b).is_some());

    let c = doc.add(Path2D::new());
    assert_ne!(a, c);
    assert_eq!(doc.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![b, c]);
}

#[test]
fn handles() {
    let mut doc = Document::new();
    let id = doc.add(triangle());
    let handle = VectorHandle {
        path: id,
        segment: 1,
        vector: 1,
    };

    assert_eq!(doc.resolve(&handle), Some(point(10.0, 0.0)));
    doc.set_vector_position(&handle, point(12.0, 0.0)).unwrap();
    assert_eq!(doc.resolve(&handle), Some(point(12.0, 0.0)));
    assert_eq!(doc.get(id).unwrap().coord(1), Some(point(12.0, 0.0)));

    let bad = VectorHandle { segment: 9, ..handle };
    assert_eq!(doc.resolve(&bad), None);
    assert_eq!(
        doc.set_vector_position(&bad, point(0.0, 0.0)),
        Err(PathError::InvalidHandle { segment: 9, vector: 1 })
    );

    doc.remove(id);
    assert_eq!(doc.resolve(&handle), None);
    assert_eq!(
        doc.set_vector_position(&handle, point(0.0, 0.0)),
        Err(PathError::UnknownPath(id))
    );
}

#[test]
fn pick_nearest_point() {
    let mut doc = Document::new();
    let id = doc.add(triangle());

    let handle = doc.pick(point(5.5, 7.0), 2.0).unwrap();
    assert_eq!(handle.path, id);
    assert_eq!(doc.resolve(&handle), Some(point(5.0, 8.0)));

    assert_eq!(doc.pick(point(50.0, 50.0), 2.0), None);

    // The origin is shared by the move-to, the first line and the close; the
    // move-to comes first.
    let handle = doc.pick(point(0.0, 0.5), 1.0).unwrap();
    assert_eq!((handle.segment, handle.vector), (0, 0));
}
