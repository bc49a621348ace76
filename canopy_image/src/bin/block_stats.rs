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
use canopy_image::{aggregate_blocks, classify_regions, gated_convolution, stretch_channels, vegetation_mask};

define_cli! { ARGS [about="print channel statistics and per block active pixel counts of an image"] =
    json: Option<String> [help="optional filename for the JSON block report", long],
    src_file: String [help="filename of image to analyze"]
}

fn main() -> Result<()> {
    init_tracing();

    let img = image::open( &ARGS.src_file)?.to_rgb8();
    let normalized = stretch_channels( &img);

    println!("RGB stats:");
    for (name, s) in ["red", "green", "blue"].iter().zip( normalized.stats.iter()) {
        println!("  {:6} {:3} .. {:3} : {:.2} ± {:.2}", name, s.min, s.max, s.mean, s.variance.sqrt());
    }

    let filtered = gated_convolution( &vegetation_mask( &normalized.image)?);
    let grid = aggregate_blocks( &filtered);

    let (w,h) = grid.dimensions();
    println!("active pixel counts ({w}x{h} grid):");
    grid.print();
    println!("tree blocks: {}, non-tree blocks: {}", grid.tree.len(), grid.non_tree.len());

    let n_sum_tree = classify_regions( &filtered).iter().filter( |b| b.is_tree()).count();
    println!("tree blocks by intensity sum: {n_sum_tree}");

    if let Some(path) = &ARGS.json {
        grid.save_json( path)?;
    }

    Ok(())
}
