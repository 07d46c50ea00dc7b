#![allow(dead_code)]

pub mod cascades;
pub mod pixel_sums;
pub mod synthetic_image;
