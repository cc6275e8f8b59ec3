//! Binary primitives shared by the row writers.

pub mod io;
