pub mod differ;
pub mod noise;
pub mod signals;
