pub mod constants;
pub mod face_crop;
pub mod frame;
pub mod region;
