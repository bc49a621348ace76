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

//! runs the raster stages for a single image and persists the derived artifacts.
//! Each invocation carries its own source image and output base path, there is no shared state
//! between invocations

use std::{io::Cursor, path::{Path,PathBuf}};
use image::{DynamicImage, EncodableLayout, GrayImage, ImageBuffer, ImageFormat, Pixel, PixelWithColorType, Rgb, RgbImage};
use ab_glyph::FontVec;
use tracing::{debug,info};
use canopy_common::fs::{ensure_parent_dir, extension, with_stem_suffix};
use crate::{
    annotate::{annotate_regions, draw_blocks},
    config::{ClassificationMode, PipelineConfig},
    errors::{CanopyImageError, Result, Stage},
    font::load_label_font,
    grid::{aggregate_blocks, GridAggregation},
    kernel::gated_convolution,
    ndvi::{vegetation_index, VegetationIndex},
    normalize::{stretch_channels, Normalized},
};

pub const NDVI_SUFFIX: &'static str = "-ndvi";
pub const NDVI_INDEX_SUFFIX: &'static str = "-ndvi-index";
pub const CONTENT_SUFFIX: &'static str = "-content5";
pub const LABELED_SUFFIX: &'static str = "-labeled";
pub const BLOCKS_SUFFIX: &'static str = "-blocks";

/// the input of one pipeline run
pub struct InvocationContext {
    pub source: RgbImage,
    pub output_base: PathBuf,
}

impl InvocationContext {
    pub fn new (source: RgbImage, output_base: impl Into<PathBuf>)->Self {
        InvocationContext { source, output_base: output_base.into() }
    }

    /// decode the source image (converting to 8 bit RGB)
    pub fn open<P,Q> (src_path: P, output_base: Q)->Result<Self> where P: AsRef<Path>, Q: Into<PathBuf> {
        let src_path = src_path.as_ref();
        let img = image::open( src_path).map_err( |e| CanopyImageError::DecodeError( format!("{src_path:?}: {e}")))?;
        debug!("{}: {:?} {}x{}", Stage::Decode, src_path, img.width(), img.height());

        Ok( Self::new( img.to_rgb8(), output_base) )
    }
}

/// derived artifact paths for an output base path. The base has to have an image file extension
#[derive(Debug,Clone,PartialEq)]
pub struct ArtifactPaths {
    pub enhanced: PathBuf,
    pub ndvi: PathBuf,
    pub ndvi_index: PathBuf,
    pub content: PathBuf,
    pub labeled: PathBuf,
    pub blocks: PathBuf,
    pub format: ImageFormat,
}

impl ArtifactPaths {
    pub fn new<P> (output_base: P)->Result<Self> where P: AsRef<Path> {
        let base = output_base.as_ref();
        let format = extension( &base)
            .and_then( ImageFormat::from_extension)
            .ok_or( CanopyImageError::InvalidImageFormat( format!("output base {base:?} has no known image extension")))?;

        Ok( ArtifactPaths {
            enhanced: base.to_path_buf(),
            ndvi: with_stem_suffix( base, NDVI_SUFFIX)?,
            ndvi_index: with_stem_suffix( base, NDVI_INDEX_SUFFIX)?,
            content: with_stem_suffix( base, CONTENT_SUFFIX)?,
            labeled: with_stem_suffix( base, LABELED_SUFFIX)?,
            blocks: with_stem_suffix( base, BLOCKS_SUFFIX)?.with_extension("json"),
            format
        })
    }
}

/// all rasters produced by one run, in stage order
pub struct PipelineOutput {
    pub normalized: Normalized<Rgb<u8>>,
    pub index: VegetationIndex,
    pub mask: GrayImage,
    pub filtered: GrayImage,
    pub grid: GridAggregation,
    pub annotated: RgbImage,
}

impl PipelineOutput {
    /// persist the artifacts of an in-memory run
    pub fn save (&self, paths: &ArtifactPaths, config: &PipelineConfig)->Result<()> {
        let writer = ArtifactWriter::new( paths, config)?;

        writer.save_normalized( &self.normalized)?;
        writer.save_index( &self.index, &self.mask)?;
        writer.save_filtered( &self.filtered)?;
        writer.save_grid( &self.grid)?;
        writer.save_annotated( &self.annotated)?;

        info!("saved artifacts for {:?}", paths.enhanced);
        Ok(())
    }
}

/// writes the artifact(s) of each stage to its derived path
struct ArtifactWriter<'a> {
    paths: &'a ArtifactPaths,
    config: &'a PipelineConfig,
}

impl<'a> ArtifactWriter<'a> {
    fn new (paths: &'a ArtifactPaths, config: &'a PipelineConfig)->Result<Self> {
        ensure_parent_dir( &paths.enhanced)
            .map_err( |e| CanopyImageError::StageFailed( Stage::Output, format!("cannot create output dir for {:?}: {e}", paths.enhanced)))?;
        Ok( ArtifactWriter{ paths, config } )
    }

    fn save_normalized (&self, normalized: &Normalized<Rgb<u8>>)->Result<()> {
        save_artifact( &normalized.image, &self.paths.enhanced, Stage::Normalize)
    }

    fn save_index (&self, index: &VegetationIndex, mask: &GrayImage)->Result<()> {
        save_artifact( mask, &self.paths.ndvi, Stage::Index)?;
        if self.config.save_index_image {
            save_artifact( &index.to_luma8(), &self.paths.ndvi_index, Stage::Index)?;
        }
        Ok(())
    }

    fn save_filtered (&self, filtered: &GrayImage)->Result<()> {
        save_artifact( filtered, &self.paths.content, Stage::Convolve)
    }

    fn save_grid (&self, grid: &GridAggregation)->Result<()> {
        if self.config.save_block_report {
            grid.save_json( &self.paths.blocks)
                .map_err( |e| CanopyImageError::StageFailed( Stage::Aggregate, format!("cannot write {:?}: {e}", self.paths.blocks)))?;
        }
        Ok(())
    }

    fn save_annotated (&self, annotated: &RgbImage)->Result<()> {
        save_artifact( annotated, &self.paths.labeled, Stage::Annotate)
    }
}

fn save_artifact<P> (img: &ImageBuffer<P,Vec<u8>>, path: &Path, stage: Stage)->Result<()>
    where P: Pixel<Subpixel=u8> + PixelWithColorType, [u8]: EncodableLayout
{
    img.save( path).map_err( |e| CanopyImageError::StageFailed( stage, format!("cannot write {path:?}: {e}")))
}

/// encode an image into an in-memory byte stream of the given format
pub fn encode_image<P> (img: &ImageBuffer<P,Vec<u8>>, format: ImageFormat)->Result<Vec<u8>>
    where P: Pixel<Subpixel=u8> + PixelWithColorType, [u8]: EncodableLayout
{
    let mut buf = Cursor::new( Vec::new());
    img.write_to( &mut buf, format)
        .map_err( |e| CanopyImageError::StageFailed( Stage::Output, format!("cannot encode {format:?}: {e}")))?;
    Ok( buf.into_inner() )
}

/// the stage sequence. This is immutable once created and can be used for any number of invocations
pub struct Pipeline {
    config: PipelineConfig,
    font: FontVec,
}

impl Pipeline {
    /// checks the config and loads the label font
    pub fn new (config: PipelineConfig)->Result<Self> {
        let font = load_label_font( &config)?;
        Self::with_font( config, font)
    }

    pub fn with_font (config: PipelineConfig, font: FontVec)->Result<Self> {
        config.check()?;
        Ok( Pipeline{ config, font } )
    }

    pub fn config (&self)->&PipelineConfig { &self.config }

    /// run all stages on the source image without persisting anything
    pub fn run (&self, source: &RgbImage)->Result<PipelineOutput> {
        self.execute( source, None)
    }

    /// run all stages and persist the artifact(s) of each stage before the next stage starts
    pub fn run_persisted (&self, source: &RgbImage, paths: &ArtifactPaths)->Result<PipelineOutput> {
        let writer = ArtifactWriter::new( paths, &self.config)?;
        let output = self.execute( source, Some(&writer))?;
        info!("saved artifacts for {:?}", paths.enhanced);
        Ok(output)
    }

    /// run all stages, persist the artifacts and return the path of the labeled image
    pub fn process (&self, ctx: &InvocationContext)->Result<PathBuf> {
        let paths = ArtifactPaths::new( &ctx.output_base)?;
        self.run_persisted( &ctx.source, &paths)?;
        Ok( paths.labeled )
    }

    fn execute (&self, source: &RgbImage, writer: Option<&ArtifactWriter>)->Result<PipelineOutput> {
        let (w,h) = source.dimensions();
        debug!("processing {w}x{h} image");

        let normalized = stretch_channels( source);
        if let Some(writer) = writer { writer.save_normalized( &normalized)?; }
        debug!("{} done", Stage::Normalize);

        let index = vegetation_index( &normalized.image)?;
        let mask = index.mask();
        if let Some(writer) = writer { writer.save_index( &index, &mask)?; }
        debug!("{} done", Stage::Index);

        let filtered = gated_convolution( &mask);
        if let Some(writer) = writer { writer.save_filtered( &filtered)?; }
        debug!("{} done", Stage::Convolve);

        let grid = aggregate_blocks( &filtered);
        if let Some(writer) = writer { writer.save_grid( &grid)?; }
        debug!("{} done: {} tree, {} non-tree blocks", Stage::Aggregate, grid.tree.len(), grid.non_tree.len());

        let pt_size = self.config.label_pt_size;
        let annotated = match self.config.mode {
            ClassificationMode::Independent => annotate_regions( &filtered, &self.font, pt_size)?,
            ClassificationMode::Unified => {
                let mut img = DynamicImage::ImageLuma8( grid.resized.clone()).to_rgb8();
                let blocks: Vec<_> = grid.blocks().into_iter().cloned().collect();
                draw_blocks( &mut img, &blocks, &self.font, pt_size)?;
                img
            }
        };
        if let Some(writer) = writer { writer.save_annotated( &annotated)?; }
        debug!("{} done ({})", Stage::Annotate, self.config.mode);

        Ok( PipelineOutput{ normalized, index, mask, filtered, grid, annotated } )
    }
}
