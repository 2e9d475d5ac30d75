pub mod normalize;
pub mod values;
