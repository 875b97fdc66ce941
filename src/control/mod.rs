//! Duty-cycle control: the tangent-shaped law, its partial settings,
//! curve sampling, and the gnuplot export built on top of it.

pub mod curve;
pub mod export;
pub mod settings;
pub mod yap;
