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

//! per channel linear contrast stretch

use image::{ImageBuffer, Pixel};
use tracing::{debug,warn};
use crate::Stats;

/// result of a channel stretch. Degenerate channels (min == max) are set to 0 in the output image
pub struct Normalized<P> where P: Pixel<Subpixel=u8> {
    pub image: ImageBuffer<P,Vec<u8>>,
    pub stats: Vec<Stats<u8>>,
    pub degenerate_channels: Vec<usize>,
}

/// get the min/max/mean stats for each channel of the image
pub fn channel_stats<P> (img: &ImageBuffer<P,Vec<u8>>)->Vec<Stats<u8>> where P: Pixel<Subpixel=u8> {
    let n_channels = P::CHANNEL_COUNT as usize;
    let mut stats: Vec<Stats<u8>> = (0..n_channels).map(|_| Stats::new()).collect();

    for pixel in img.pixels() {
        for (c,v) in pixel.channels().iter().enumerate() {
            stats[c].add( *v);
        }
    }

    stats
}

/// stretch each channel independently to [0..255] using the channel min/max:
///   v' = round( (v - min) / (max - min) * 255)
pub fn stretch_channels<P> (img: &ImageBuffer<P,Vec<u8>>)->Normalized<P> where P: Pixel<Subpixel=u8> {
    let n_channels = P::CHANNEL_COUNT as usize;
    let stats = channel_stats( img);

    let mut degenerate_channels = Vec::new();
    let luts: Vec<[u8;256]> = stats.iter().enumerate().map( |(c,s)| {
        if s.is_degenerate() {
            degenerate_channels.push(c);
            [0u8;256]
        } else {
            debug!("channel {c} range: {} .. {}", s.min, s.max);
            compute_stretch_lut( s.min, s.max)
        }
    }).collect();

    if !degenerate_channels.is_empty() {
        warn!("no contrast in channels {:?}, output set to 0", degenerate_channels);
    }

    let mut image = img.clone();
    for (i, v) in image.iter_mut().enumerate() {
        *v = luts[i % n_channels][*v as usize];
    }

    Normalized{ image, stats, degenerate_channels }
}

/// lookup table for a min/max stretch. Values outside [min..max] do not occur in the source
fn compute_stretch_lut (min: u8, max: u8)->[u8;256] {
    let mut lut = [0u8;256];
    let range = (max - min) as f64;

    for v in min..=max {
        let d = (v - min) as f64;
        lut[v as usize] = ((d / range) * 255.0).round().clamp( 0.0, 255.0) as u8;
    }

    lut
}
