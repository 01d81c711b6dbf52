#![deny(bare_trait_objects)]

//! Scanning and normalizing SVG path data.
//!
//! This crate is reexported in [vellum](../vellum/index.html).
//!
//! # Overview
//!
//! [`PathParser`] reads the SVG path mini-language one command at a time from a
//! [`Source`] of characters, producing [`SvgEvent`]s. The normalization functions then
//! make the commands absolute ([`absolutize`]) and rewrite them in terms of the `M`, `L`,
//! `C` and `Z` commands only ([`reduce`]), which is what the vellum path model consumes.
//!
//! ```
//! use vellum_svg::{path_data, SvgEvent};
//! use vellum_svg::geom::point;
//!
//! let events = path_data("M 0 0 Q 3 3 6 0");
//! assert_eq!(
//!     events,
//!     vec![
//!         SvgEvent::MoveTo(point(0.0, 0.0)),
//!         SvgEvent::CubicTo(point(2.0, 2.0), point(4.0, 2.0), point(6.0, 0.0)),
//!     ]
//! );
//! ```
//!
//! Malformed path data is not an error at this level: [`path_data`] and
//! [`subpath_array`] return the commands parsed before the problem. Use the
//! [`PathParser`] directly to get a [`ParseError`] with the position of the problem.

pub use vellum_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod events;
pub mod normalize;
pub mod parser;

#[doc(inline)]
pub use crate::events::SvgEvent;
#[doc(inline)]
pub use crate::normalize::{
    absolutize, parse_events, path_data, path_data_with_options, reduce, subpath_array,
    subpath_array_with_options,
};
#[doc(inline)]
pub use crate::parser::{ParseError, ParserOptions, PathParser, Source};
