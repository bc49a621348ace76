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

//! gated 7x7 kernel filter for vegetation masks

use std::ops::RangeInclusive;
use image::{GrayImage, Luma};
use tracing::debug;

pub const KERNEL_SIZE: u32 = 7;
const KERNEL_CENTER: u32 = KERNEL_SIZE / 2;

/// the diamond/cross weights. Note the response is divided by the number of all cells (49), not by the
/// number of non-zero weights
pub const KERNEL: [[u8;KERNEL_SIZE as usize];KERNEL_SIZE as usize] = [
    [1, 0, 0, 1, 0, 0, 1],
    [0, 1, 0, 1, 0, 1, 0],
    [0, 0, 1, 1, 1, 0, 0],
    [1, 1, 1, 1, 1, 1, 1],
    [0, 0, 1, 1, 1, 0, 0],
    [0, 1, 0, 1, 0, 1, 0],
    [1, 0, 0, 1, 0, 0, 1]
];

const KERNEL_CELLS: f64 = (KERNEL_SIZE * KERNEL_SIZE) as f64;

/// responses outside this range are set to 0
pub const GATE: RangeInclusive<f64> = 30.0..=50.0;

pub fn kernel_weight_count ()->usize {
    KERNEL.iter().flatten().filter( |w| **w != 0).count()
}

/// weighted mean of the 7x7 window with top left corner (x0,y0). Caller has to make sure the window is
/// inside the image
pub fn window_response (img: &GrayImage, x0: u32, y0: u32)->f64 {
    let mut sum: u32 = 0;

    for (k, row) in KERNEL.iter().enumerate() {
        let y = y0 + k as u32;
        for (m, w) in row.iter().enumerate() {
            if *w != 0 {
                sum += img.get_pixel( x0 + m as u32, y).0[0] as u32 * *w as u32;
            }
        }
    }

    sum as f64 / KERNEL_CELLS
}

/// slide the kernel over all windows that are fully inside the mask and store the gated (truncated)
/// response in the window center. This is done in place on a copy of the mask, rows outer and columns
/// inner, i.e. windows see the center values written by previous windows.
/// Cells closer than 3 pixels to the border keep their mask value
pub fn gated_convolution (mask: &GrayImage)->GrayImage {
    let (w,h) = mask.dimensions();
    let mut filtered = mask.clone();

    if w < KERNEL_SIZE || h < KERNEL_SIZE {
        debug!("mask {w}x{h} smaller than kernel, no filtering");
        return filtered
    }

    for i in 0..=(h - KERNEL_SIZE) {
        for j in 0..=(w - KERNEL_SIZE) {
            let r = window_response( &filtered, j, i);
            let v = if GATE.contains( &r) { r as u8 } else { 0 };
            filtered.put_pixel( j + KERNEL_CENTER, i + KERNEL_CENTER, Luma([v]));
        }
    }

    filtered
}
