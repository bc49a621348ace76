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

//! vegetation block classification of photographic rasters.
//! The processing is a fixed chain of raster stages that each take the output of the previous one:
//!
//!   source RGB -> [normalize] -> stretched RGB -> [ndvi] -> binary mask -> [kernel] -> filtered mask
//!        -> [grid] block counts (informational)
//!        -> [annotate] labeled image
//!
//! All thresholds and the kernel are fixed constants of the respective modules. The [pipeline] module
//! runs the chain for one invocation and persists the derived artifacts.

use std::ops::{Add, Div, Mul, Sub};
use num::{Zero,Bounded};

mod errors;
pub use errors::{Result,CanopyImageError,Stage};

pub mod normalize;
pub use normalize::{channel_stats, stretch_channels, Normalized};

pub mod ndvi;
pub use ndvi::{vegetation_index, vegetation_mask, VegetationIndex};

pub mod kernel;
pub use kernel::{gated_convolution, KERNEL};

pub mod grid;
pub use grid::{aggregate_blocks, Block, BlockClass, GridAggregation, BLOCK_SIZE};

pub mod annotate;
pub use annotate::{annotate_regions, classify_regions, draw_blocks};

pub mod font;
pub use font::{load_default_font, load_font, load_label_font};

pub mod config;
pub use config::{ClassificationMode, PipelineConfig};

pub mod pipeline;
pub use pipeline::{encode_image, ArtifactPaths, InvocationContext, Pipeline, PipelineOutput};

/// running min/max/mean/variance statistics over a stream of values
#[derive(Debug,Clone)]
pub struct Stats<T> {
    pub min: T,
    pub max: T,
    pub mean: f64,
    pub variance: f64,

    pub s: f64,
    pub n: usize
}

impl <T> Stats<T>
    where T: Add<T,Output=T> + Sub<T,Output=T> + Div<T,Output=T> + Mul<T,Output=T> +
             Bounded + PartialOrd + PartialEq + Zero + Into<f64> + Copy
{
    pub fn new ()->Self {
        let min = T::max_value();
        let max = T::min_value();
        let mean: f64 = 0.0;
        let variance: f64 = 0.0;

        Stats{min,max,mean,variance, s: 0.0, n: 0}
    }

    pub fn add (&mut self, v: T) {
        self.n += 1;

        if v < self.min { self.min = v }
        if v > self.max { self.max = v }

        let prev_mean = self.mean;
        let v: f64 = v.into();
        let n = self.n as f64;

        self.mean = (v + (n * prev_mean) - prev_mean) / n;
        self.s = self.s + (v - prev_mean) * (v - self.mean);
        self.variance = self.s / n;
    }

    /// no values or all values are the same (min == max)
    pub fn is_degenerate (&self)->bool {
        self.n == 0 || !(self.max > self.min)
    }
}
