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
use canopy_common::{check_cli, define_cli, init_tracing};
use canopy_image::{ArtifactPaths, Block, ClassificationMode, InvocationContext, Pipeline, PipelineConfig};

define_cli! { ARGS [about="classify 50x50 pixel blocks of an image as tree/non-tree and write a labeled image"] =
    config: Option<String> [help="optional pipeline config file (RON)", long],
    mode: Option<ClassificationMode> [help="block classification mode for the labeled image (independent|unified)", long],
    font: Option<String> [help="optional TrueType font file for block labels", long],
    src_file: String [help="filename of image to classify"],
    output_base: String [help="output base path for derived images (e.g. outputs/forest.jpeg)"]
}

fn main() -> Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let mut config = match &ARGS.config {
        Some(path) => PipelineConfig::load( path)?,
        None => PipelineConfig::default()
    };
    if let Some(mode) = ARGS.mode { config.mode = mode; }
    if let Some(font) = &ARGS.font { config.font = Some( font.into()); }

    let pipeline = Pipeline::new( config)?;
    let ctx = InvocationContext::open( &ARGS.src_file, &ARGS.output_base)?;
    let paths = ArtifactPaths::new( &ctx.output_base)?;

    let output = pipeline.run_persisted( &ctx.source, &paths)?;

    let tree: Vec<[u64;5]> = output.grid.tree.iter().map( Block::as_row).collect();
    let non_tree: Vec<[u64;5]> = output.grid.non_tree.iter().map( Block::as_row).collect();
    println!("Tree list: {:?}", tree);
    println!("Non-tree list: {:?}", non_tree);

    println!("{}", paths.labeled.display());
    Ok(())
}
