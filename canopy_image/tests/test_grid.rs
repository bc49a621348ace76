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

use image::{GrayImage, Luma};
use canopy_image::grid::{
    aggregate_blocks, block_origins, resize_to_block_grid, truncated_dimensions, Block, BlockClass, BLOCK_SIZE
};

// run with "cargo test test_xx -- --nocapture"

/// set the first n pixels (row-major) of the block at (row,col) to value v
fn fill_block (img: &mut GrayImage, row: u32, col: u32, n: u32, v: u8) {
    for k in 0..n {
        img.put_pixel( col + k % BLOCK_SIZE, row + k / BLOCK_SIZE, Luma([v]));
    }
}

#[test]
fn test_truncated_dimensions() {
    assert_eq!( truncated_dimensions( 120, 110), (100,100));
    assert_eq!( truncated_dimensions( 100, 50), (100,50));
    assert_eq!( truncated_dimensions( 49, 300), (0,300));
}

#[test]
fn test_block_origins() {
    let origins: Vec<(u32,u32)> = block_origins( 149, 100).collect();
    assert_eq!( origins, vec![(0,0), (0,50), (50,0), (50,50)]);
    assert_eq!( block_origins( 49, 49).count(), 0);
}

#[test]
fn test_resize() {
    let img = GrayImage::from_fn( 100, 50, |x,y| Luma([ (x ^ y) as u8 ]));
    assert_eq!( resize_to_block_grid( &img), img);

    let img = GrayImage::from_pixel( 120, 110, Luma([77]));
    let resized = resize_to_block_grid( &img);
    assert_eq!( resized.dimensions(), (100,100));
    assert!( resized.pixels().all( |p| p.0[0] == 77));

    let img = GrayImage::new( 30, 80);
    assert_eq!( resize_to_block_grid( &img).dimensions(), (0,50));
}

#[test]
fn test_tree_threshold() {
    let mut img = GrayImage::from_pixel( 150, 100, Luma([39])); // just below active
    fill_block( &mut img, 0, 0, 50, 40);   // exactly TREE_PIXEL_COUNT -> tree
    fill_block( &mut img, 0, 50, 49, 255); // one short -> non-tree
    fill_block( &mut img, 50, 100, 2500, 41);

    let grid = aggregate_blocks( &img);
    grid.print();

    assert_eq!( grid.dimensions(), (150,100));
    assert_eq!( grid.counts.dim(), (2,3));
    assert_eq!( grid.counts[[0,0]], 50);
    assert_eq!( grid.counts[[0,1]], 49);
    assert_eq!( grid.counts[[1,2]], 2500);
    assert_eq!( grid.n_blocks(), 6);

    let tree: Vec<[u64;5]> = grid.tree.iter().map( Block::as_row).collect();
    assert_eq!( tree, vec![[0,50,0,50,50], [50,100,100,150,2500]]);

    let non_tree: Vec<[u64;5]> = grid.non_tree.iter().map( Block::as_row).collect();
    assert_eq!( non_tree, vec![[0,50,50,100,49], [0,50,100,150,0], [50,100,0,50,0], [50,100,50,100,0]]);

    let blocks = grid.blocks();
    let origins: Vec<(u32,u32)> = blocks.iter().map( |b| (b.row_start, b.col_start)).collect();
    assert_eq!( origins, vec![(0,0), (0,50), (0,100), (50,0), (50,50), (50,100)]);
    assert!( blocks[0].is_tree());
    assert!( !blocks[1].is_tree());
}

#[test]
fn test_no_blocks() {
    let img = GrayImage::from_pixel( 49, 200, Luma([255]));
    let grid = aggregate_blocks( &img);
    assert_eq!( grid.n_blocks(), 0);
    assert_eq!( grid.dimensions(), (0,200));
}

#[test]
fn test_block_class() {
    assert_eq!( BlockClass::Tree.to_string(), "tree");
    assert_eq!( BlockClass::NonTree.to_string(), "non-tree");
    assert_eq!( BlockClass::Tree.label(), "tree");
    assert_eq!( BlockClass::NonTree.label(), "NT");

    let b = Block::new( 50, 100, 7, BlockClass::NonTree);
    assert_eq!( (b.width(), b.height()), (BLOCK_SIZE, BLOCK_SIZE));
    assert_eq!( b.as_row(), [50, 100, 100, 150, 7]);
}

#[test]
fn test_json_report() {
    let mut img = GrayImage::new( 100, 50);
    fill_block( &mut img, 0, 50, 2500, 200);
    let grid = aggregate_blocks( &img);

    let json = grid.to_json().unwrap();
    println!("{json}");
    let v: serde_json::Value = serde_json::from_str( &json).unwrap();

    assert_eq!( v["width"], 100);
    assert_eq!( v["height"], 50);
    assert_eq!( v["tree"][0]["col_start"], 50);
    assert_eq!( v["tree"][0]["value"], 2500);
    assert_eq!( v["tree"][0]["class"], "Tree");
    assert_eq!( v["non_tree"][0]["col_start"], 0);
    assert_eq!( v["non_tree"][0]["value"], 0);

    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("blocks.json");
    grid.save_json( &path).unwrap();
    assert_eq!( std::fs::read_to_string( &path).unwrap(), json);
}
