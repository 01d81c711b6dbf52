//! Named shape factories.
//!
//! A [`ShapeRegistry`] maps preset names to functions that build a path fitting a
//! rectangle. Registries are plain values: build one where it is needed and pass it
//! around.
//!
//! ```
//! use vellum_path::registry::ShapeRegistry;
//! use vellum_path::geom::Rect2D;
//!
//! let registry = ShapeRegistry::with_builtin_shapes();
//! let path = registry.build("roundRect", &Rect2D::new(0.0, 0.0, 30.0, 60.0)).unwrap();
//! assert!(!path.is_empty());
//! ```

use crate::geom::Rect2D;
use crate::path::Path2D;
use crate::shapes::{ellipse_shape, rect_shape, round_rect_shape};
use crate::PathError;

use std::collections::BTreeMap;
use std::fmt;

/// Builds a path that fits the given rectangle.
pub type ShapeFactory = Box<dyn Fn(&Rect2D) -> Result<Path2D, PathError>>;

/// A collection of shape factories, by name.
#[derive(Default)]
pub struct ShapeRegistry {
    factories: BTreeMap<String, ShapeFactory>,
}

impl ShapeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        ShapeRegistry {
            factories: BTreeMap::new(),
        }
    }

    /// A registry holding the built-in shapes.
    pub fn with_builtin_shapes() -> Self {
        let mut registry = ShapeRegistry::new();
        registry.load_builtin();
        registry
    }

    /// Registers the built-in shapes: `rect`, `roundRect` and `ellipse`.
    ///
    /// Existing factories with the same names are replaced.
    pub fn load_builtin(&mut self) {
        self.register("rect", |r: &Rect2D| rect_shape(r.x, r.y, r.w, r.h));
        self.register("roundRect", |r: &Rect2D| round_rect_shape(r.x, r.y, r.w, r.h));
        self.register("ellipse", |r: &Rect2D| {
            let center = r.center();
            ellipse_shape(center.x, center.y, r.w / 2.0, r.h / 2.0)
        });
    }

    /// Registers a factory, replacing any factory with the same name.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&Rect2D) -> Result<Path2D, PathError> + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// The registered names, in lexicographic order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Builds the shape `name` in the rectangle `rect`.
    pub fn build(&self, name: &str, rect: &Rect2D) -> Result<Path2D, PathError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PathError::UnknownShape(name.to_string()))?;
        log::trace!("building shape {:?} in {}", name, rect);

        factory(rect)
    }
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

#[cfg(test)]
use crate::geom::point;

#[test]
fn builtin_shapes() {
    let registry = ShapeRegistry::with_builtin_shapes();
    assert_eq!(registry.names(), vec!["ellipse", "rect", "roundRect"]);
    assert_eq!(registry.len(), 3);

    let rect = Rect2D::new(10.0, 10.0, 20.0, 10.0);
    let path = registry.build("rect", &rect).unwrap();
    assert_eq!(path.bounds2d().min, point(10.0, 10.0));
    assert_eq!(path.bounds2d().max, point(30.0, 20.0));

    let path = registry.build("ellipse", &rect).unwrap();
    assert_eq!(path.coord(0), Some(point(30.0, 15.0)));
}

#[test]
fn unknown_shape() {
    let registry = ShapeRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(
        registry.build("star", &Rect2D::new(0.0, 0.0, 1.0, 1.0)),
        Err(PathError::UnknownShape("star".to_string()))
    );
}

#[test]
fn custom_factories() {
    let mut registry = ShapeRegistry::with_builtin_shapes();
    registry.register("rect", |r: &Rect2D| {
        let mut path = Path2D::new();
        path.move_to(point(r.x, r.y));
        Ok(path)
    });
    registry.register("dot", |r: &Rect2D| {
        let mut path = Path2D::new();
        path.move_to(r.center());
        Ok(path)
    });

    assert!(registry.contains("dot"));
    assert_eq!(registry.len(), 4);
    let path = registry.build("rect", &Rect2D::new(1.0, 2.0, 3.0, 4.0)).unwrap();
    assert_eq!(path.num_segments(), 1);
}
