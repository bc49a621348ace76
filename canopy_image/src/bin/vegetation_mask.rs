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

use anyhow::Result;
use canopy_common::{define_cli, init_tracing};
use canopy_image::{gated_convolution, stretch_channels, vegetation_index};

define_cli! { ARGS [about="compute the binary vegetation mask of an image"] =
    index_file: Option<String> [help="optional filename for the byte quantized vegetation index", long],
    filtered_file: Option<String> [help="optional filename for the kernel filtered mask", long],
    src_file: String [help="filename of input image"],
    tgt_file: String [help="filename of mask image"]
}

fn main() -> Result<()> {
    init_tracing();

    let img = image::open( &ARGS.src_file)?.to_rgb8();
    let normalized = stretch_channels( &img);
    let index = vegetation_index( &normalized.image)?;
    let mask = index.mask();

    let (w,h) = mask.dimensions();
    let n_on = mask.pixels().filter( |p| p.0[0] > 0).count();
    println!("vegetation pixels: {} of {} ({} without index)", n_on, w as usize * h as usize, index.n_undefined());

    if let Some(path) = &ARGS.index_file {
        index.to_luma8().save( path)?;
    }
    if let Some(path) = &ARGS.filtered_file {
        gated_convolution( &mask).save( path)?;
    }

    mask.save( &ARGS.tgt_file)?;
    Ok(())
}
