pub mod decoded_frame;
pub mod options;
