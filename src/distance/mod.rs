//! Travel time matrix.

mod matrix;

pub use matrix::TravelTimeMatrix;
