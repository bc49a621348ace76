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

//! block grid aggregation of filtered vegetation masks

use std::{fs::File, io::Write, path::Path};
use image::{imageops::{self, FilterType}, GenericImageView, GrayImage};
use ndarray::Array2;
use serde::{Serialize,Deserialize};
use tracing::{debug,info};
use crate::errors::Result;

pub const BLOCK_SIZE: u32 = 50;

/// pixels with values >= this are active
pub const ACTIVE_PIXEL_THRESHOLD: u8 = 40;

/// blocks with at least this many active pixels are classified as tree
pub const TREE_PIXEL_COUNT: u64 = 50;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,strum::Display)]
pub enum BlockClass {
    #[strum(to_string="tree")] Tree,
    #[strum(to_string="non-tree")] NonTree
}

impl BlockClass {
    /// the short label we draw into annotated images
    pub fn label (&self)->&'static str {
        match self {
            BlockClass::Tree => "tree",
            BlockClass::NonTree => "NT"
        }
    }
}

/// a BLOCK_SIZE x BLOCK_SIZE region of a raster with its aggregated value (active pixel count or intensity sum).
/// End coordinates are exclusive
#[derive(Debug,Clone,PartialEq,Eq,Serialize,Deserialize)]
pub struct Block {
    pub row_start: u32,
    pub row_end: u32,
    pub col_start: u32,
    pub col_end: u32,
    pub value: u64,
    pub class: BlockClass,
}

impl Block {
    pub fn new (row: u32, col: u32, value: u64, class: BlockClass)->Self {
        Block { row_start: row, row_end: row + BLOCK_SIZE, col_start: col, col_end: col + BLOCK_SIZE, value, class }
    }

    pub fn width (&self)->u32 { self.col_end - self.col_start }
    pub fn height (&self)->u32 { self.row_end - self.row_start }

    /// [row_start, row_end, col_start, col_end, value]
    pub fn as_row (&self)->[u64;5] {
        [self.row_start as u64, self.row_end as u64, self.col_start as u64, self.col_end as u64, self.value]
    }

    pub fn is_tree (&self)->bool { self.class == BlockClass::Tree }
}

/// (row,col) origins of all complete blocks in a width x height raster, row-major. Partial blocks at
/// the right and bottom border are skipped
pub fn block_origins (width: u32, height: u32)->impl Iterator<Item=(u32,u32)> {
    let n_rows = height / BLOCK_SIZE;
    let n_cols = width / BLOCK_SIZE;

    (0..n_rows).flat_map( move |r| (0..n_cols).map( move |c| (r * BLOCK_SIZE, c * BLOCK_SIZE)))
}

/// sum of f(v) over all pixel values of a block
pub fn fold_block<F> (img: &GrayImage, row: u32, col: u32, f: F)->u64 where F: Fn(u8)->u64 {
    img.view( col, row, BLOCK_SIZE, BLOCK_SIZE).pixels().map( |(_,_,p)| f(p.0[0])).sum()
}

/// round dimensions down to the nearest multiple of BLOCK_SIZE
pub fn truncated_dimensions (width: u32, height: u32)->(u32,u32) {
    ((width / BLOCK_SIZE) * BLOCK_SIZE, (height / BLOCK_SIZE) * BLOCK_SIZE)
}

/// resample the whole raster into the truncated dimensions (nearest neighbor). Rasters that already have
/// multiple-of-BLOCK_SIZE dimensions are copied unchanged
pub fn resize_to_block_grid (img: &GrayImage)->GrayImage {
    let (w,h) = img.dimensions();
    let (nw,nh) = truncated_dimensions( w, h);

    if (nw,nh) == (w,h) {
        img.clone()
    } else if nw == 0 || nh == 0 {
        GrayImage::new( nw, nh)
    } else {
        imageops::resize( img, nw, nh, FilterType::Nearest)
    }
}

/// stage 4 result. This is informational and not used to annotate images in the default
/// (independent) classification mode
pub struct GridAggregation {
    pub resized: GrayImage,
    pub counts: Array2<u32>,
    pub tree: Vec<Block>,
    pub non_tree: Vec<Block>,
}

#[derive(Serialize)]
struct BlockReport<'a> {
    width: u32,
    height: u32,
    tree: &'a [Block],
    non_tree: &'a [Block],
}

impl GridAggregation {
    pub fn dimensions (&self)->(u32,u32) { self.resized.dimensions() }

    pub fn n_blocks (&self)->usize { self.tree.len() + self.non_tree.len() }

    /// all blocks in row-major order
    pub fn blocks (&self)->Vec<&Block> {
        let mut blocks: Vec<&Block> = self.tree.iter().chain( self.non_tree.iter()).collect();
        blocks.sort_by_key( |b| (b.row_start, b.col_start));
        blocks
    }

    pub fn to_json (&self)->Result<String> {
        let (width,height) = self.dimensions();
        let report = BlockReport{ width, height, tree: &self.tree, non_tree: &self.non_tree };
        Ok( serde_json::to_string_pretty( &report)? )
    }

    pub fn save_json<P> (&self, path: P)->Result<()> where P: AsRef<Path> {
        let mut file = File::create( path)?;
        file.write_all( self.to_json()?.as_bytes())?;
        Ok(())
    }

    pub fn print (&self) {
        let (n_rows, n_cols) = self.counts.dim();

        print!( "     ");
        for c in 0..n_cols { print!( "{:6}", c); }
        println!();
        for r in 0..n_rows {
            print!( "{:3} │", r);
            for c in 0..n_cols {
                print!( "{:6}", self.counts[[r,c]]);
            }
            println!();
        }
    }
}

/// resize the filtered mask to the block grid, then count active pixels per block and classify blocks
pub fn aggregate_blocks (filtered: &GrayImage)->GridAggregation {
    let resized = resize_to_block_grid( filtered);
    let (w,h) = resized.dimensions();
    let mut counts = Array2::<u32>::zeros( ((h / BLOCK_SIZE) as usize, (w / BLOCK_SIZE) as usize));
    let mut tree = Vec::new();
    let mut non_tree = Vec::new();

    if w == 0 || h == 0 {
        debug!("filtered mask {:?} smaller than block size, no blocks", filtered.dimensions());
    }

    for (row,col) in block_origins( w, h) {
        let count = fold_block( &resized, row, col, |v| (v >= ACTIVE_PIXEL_THRESHOLD) as u64);
        counts[[(row / BLOCK_SIZE) as usize, (col / BLOCK_SIZE) as usize]] = count as u32;

        if count >= TREE_PIXEL_COUNT {
            tree.push( Block::new( row, col, count, BlockClass::Tree));
        } else {
            non_tree.push( Block::new( row, col, count, BlockClass::NonTree));
        }
    }

    info!("tree blocks: {:?}", tree.iter().map( Block::as_row).collect::<Vec<_>>());
    info!("non-tree blocks: {:?}", non_tree.iter().map( Block::as_row).collect::<Vec<_>>());

    GridAggregation{ resized, counts, tree, non_tree }
}
