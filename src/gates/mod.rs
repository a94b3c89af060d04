pub mod affine;
pub mod sigmoid;
