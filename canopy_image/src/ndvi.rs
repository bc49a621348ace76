/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! normalized difference vegetation index computed from the first two channels of an image.
//! Channel 0 is used as the vegetation band, channel 1 as the reference band

use std::ops::RangeInclusive;
use image::{GrayImage, ImageBuffer, Luma, Pixel};
use ndarray::Array2;
use tracing::debug;
use crate::errors::{CanopyImageError, Result, Stage};

pub const VEGETATION_BAND: usize = 0;
pub const REFERENCE_BAND: usize = 1;

/// index values that are considered to be vegetation
pub const INDEX_BAND: RangeInclusive<f32> = 0.2..=0.9;

pub const MASK_ON: u8 = 255;
pub const MASK_OFF: u8 = 0;

/// per pixel index values in [-1..1], stored as (row,col)
pub struct VegetationIndex {
    values: Array2<f32>,
    n_undefined: usize,
}

impl VegetationIndex {
    pub fn values (&self)->&Array2<f32> { &self.values }

    /// number of pixels for which both bands were 0 (index set to 0)
    pub fn n_undefined (&self)->usize { self.n_undefined }

    /// (width,height)
    pub fn dimensions (&self)->(u32,u32) {
        let (rows,cols) = self.values.dim();
        (cols as u32, rows as u32)
    }

    #[inline(always)]
    pub fn get (&self, x: u32, y: u32)->f32 {
        self.values[[y as usize, x as usize]]
    }

    /// the binary vegetation mask: MASK_ON if the index is within INDEX_BAND, MASK_OFF otherwise
    pub fn mask (&self)->GrayImage {
        let (w,h) = self.dimensions();
        GrayImage::from_fn( w, h, |x,y| {
            Luma([ if INDEX_BAND.contains( &self.get(x,y)) { MASK_ON } else { MASK_OFF } ])
        })
    }

    /// byte quantized index: (v + 1) / 2 * 255, truncated
    pub fn to_luma8 (&self)->GrayImage {
        let (w,h) = self.dimensions();
        GrayImage::from_fn( w, h, |x,y| {
            Luma([ ((self.get(x,y) + 1.0) / 2.0 * 255.0) as u8 ])
        })
    }
}

/// compute (b0 - b1) / (b0 + b1) for each pixel. Pixels with b0 + b1 == 0 get an index of 0
pub fn vegetation_index<P> (img: &ImageBuffer<P,Vec<u8>>)->Result<VegetationIndex> where P: Pixel<Subpixel=u8> {
    let n_channels = P::CHANNEL_COUNT as usize;
    if n_channels <= REFERENCE_BAND {
        return Err( CanopyImageError::StageFailed( Stage::Index, format!("requires at least 2 channels, got {n_channels}")))
    }

    let (w,h) = img.dimensions();
    let mut values = Array2::<f32>::zeros( (h as usize, w as usize));
    let mut n_undefined = 0;

    for (x, y, pixel) in img.enumerate_pixels() {
        let c = pixel.channels();
        let b0 = c[VEGETATION_BAND] as f32;
        let b1 = c[REFERENCE_BAND] as f32;
        let sum = b0 + b1;

        values[[y as usize, x as usize]] = if sum != 0.0 {
            (b0 - b1) / sum
        } else {
            n_undefined += 1;
            0.0
        };
    }

    if n_undefined > 0 { debug!("{n_undefined} pixels without vegetation index (both bands 0)"); }

    Ok( VegetationIndex{ values, n_undefined } )
}

pub fn vegetation_mask<P> (img: &ImageBuffer<P,Vec<u8>>)->Result<GrayImage> where P: Pixel<Subpixel=u8> {
    Ok( vegetation_index( img)?.mask() )
}
