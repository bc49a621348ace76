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
use canopy_image::stretch_channels;

define_cli! { ARGS [about="stretch each RGB channel of an image to the full [0..255] range"] =
    src_file: String [help="filename of input image"],
    tgt_file: String [help="filename of stretched image"]
}

fn main() -> Result<()> {
    init_tracing();

    let img = image::open( &ARGS.src_file)?.to_rgb8();
    let normalized = stretch_channels( &img);

    for (c, s) in normalized.stats.iter().enumerate() {
        println!("channel {c}: {:3} .. {:3} : {:.2}", s.min, s.max, s.mean);
    }
    if !normalized.degenerate_channels.is_empty() {
        println!("no contrast in channels: {:?}", normalized.degenerate_channels);
    }

    normalized.image.save( &ARGS.tgt_file)?;
    Ok(())
}
