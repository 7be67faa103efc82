pub mod binary;
pub mod ppm;
