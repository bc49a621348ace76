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

//! block classification by raw intensity sum and labeled block overlays

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::{drawing::{draw_hollow_rect_mut, draw_text_mut}, rect::Rect};
use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use crate::{
    config::check_pt_size,
    errors::{CanopyImageError, Result},
    grid::{block_origins, fold_block, Block, BlockClass}
};

/// blocks with a pixel value sum above this are classified as tree
pub const ANNOTATION_SUM_THRESHOLD: u64 = 10;

pub const RECT_STROKE_WIDTH: u32 = 2;

pub const GREEN: Rgb<u8> = Rgb([0, 128, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// (rectangle, text) colors
pub fn block_colors (class: BlockClass)->(Rgb<u8>,Rgb<u8>) {
    match class {
        BlockClass::Tree => (GREEN, WHITE),
        BlockClass::NonTree => (BLACK, RED)
    }
}

/// scan complete blocks of the (un-resized) filtered mask and classify them by the sum of their raw pixel values
pub fn classify_regions (filtered: &GrayImage)->Vec<Block> {
    let (w,h) = filtered.dimensions();

    block_origins( w, h).map( |(row,col)| {
        let sum = fold_block( filtered, row, col, |v| v as u64);
        let class = if sum > ANNOTATION_SUM_THRESHOLD { BlockClass::Tree } else { BlockClass::NonTree };
        Block::new( row, col, sum, class)
    }).collect()
}

/// classify blocks of the filtered mask and draw them onto a RGB copy of it
pub fn annotate_regions (filtered: &GrayImage, font: &FontVec, pt_size: f32)->Result<RgbImage> {
    let blocks = classify_regions( filtered);
    let mut img = DynamicImage::ImageLuma8( filtered.clone()).to_rgb8();
    draw_blocks( &mut img, &blocks, font, pt_size)?;
    Ok(img)
}

/// draw block outlines and labels that are centered within the block
pub fn draw_blocks (img: &mut RgbImage, blocks: &[Block], font: &FontVec, pt_size: f32)->Result<()> {
    check_pt_size( pt_size)?;
    let scale = font.pt_to_px_scale( pt_size).ok_or( CanopyImageError::IllegalArgument( format!("invalid font pt size {pt_size}")))?;
    let (w,h) = img.dimensions();

    for block in blocks {
        if block.col_end > w || block.row_end > h {
            return Err( CanopyImageError::IllegalArgument( format!("block {:?} outside of {w}x{h} image", block.as_row())))
        }

        let (rect_color, text_color) = block_colors( block.class);
        draw_block_outline( img, block, rect_color);
        draw_block_label( img, block, font, scale, text_color);
    }

    Ok(())
}

/// outline with RECT_STROKE_WIDTH pixels, drawn inside of the block extent
fn draw_block_outline (img: &mut RgbImage, block: &Block, color: Rgb<u8>) {
    let (bw,bh) = (block.width(), block.height());

    for k in 0..RECT_STROKE_WIDTH {
        if bw > 2*k && bh > 2*k {
            let rect = Rect::at( (block.col_start + k) as i32, (block.row_start + k) as i32).of_size( bw - 2*k, bh - 2*k);
            draw_hollow_rect_mut( img, rect, color);
        }
    }
}

/// pixel bounds of the rendered glyphs relative to the draw_text_mut origin. This follows the glyph layout
/// of imageproc (origin at ascent, advance and kerning per glyph)
pub fn text_ink_bounds (font: &FontVec, scale: PxScale, text: &str)->Option<ab_glyph::Rect> {
    let scaled = font.as_scaled( scale);
    let mut x = 0.0f32;
    let mut last: Option<GlyphId> = None;
    let mut bounds: Option<ab_glyph::Rect> = None;

    for c in text.chars() {
        let id = scaled.glyph_id( c);
        let glyph = id.with_scale_and_position( scale, point( x, scaled.ascent()));
        x += scaled.h_advance( id);

        if let Some(outlined) = scaled.outline_glyph( glyph) {
            if let Some(last) = last { x += scaled.kern( id, last); }
            last = Some(id);

            let bb = outlined.px_bounds();
            bounds = Some( match bounds {
                Some(b) => ab_glyph::Rect {
                    min: point( b.min.x.min( bb.min.x), b.min.y.min( bb.min.y)),
                    max: point( b.max.x.max( bb.max.x), b.max.y.max( bb.max.y))
                },
                None => bb
            });
        }
    }

    bounds
}

/// the label ink is centered in the block (integer pixels, remainders go to the right/bottom)
fn draw_block_label (img: &mut RgbImage, block: &Block, font: &FontVec, scale: PxScale, color: Rgb<u8>) {
    let label = block.class.label();

    if let Some(bounds) = text_ink_bounds( font, scale, label) {
        let tw = (bounds.max.x - bounds.min.x) as i32;
        let th = (bounds.max.y - bounds.min.y) as i32;
        let x = block.col_start as i32 + (block.width() as i32 - tw) / 2 - bounds.min.x.round() as i32;
        let y = block.row_start as i32 + (block.height() as i32 - th) / 2 - bounds.min.y.round() as i32;

        draw_text_mut( img, color, x, y, scale, font, label);
    }
}
