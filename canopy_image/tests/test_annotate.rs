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

use image::{GrayImage, Luma, Rgb, RgbImage};
use ab_glyph::FontVec;
use canopy_image::{
    annotate::{annotate_regions, block_colors, classify_regions, draw_blocks, BLACK, GREEN, RED, WHITE},
    font::{load_default_font, load_font, load_label_font},
    grid::{Block, BlockClass},
    CanopyImageError, PipelineConfig
};

// run with "cargo test test_xx -- --nocapture"

fn font ()->FontVec {
    load_default_font().unwrap()
}

/// 100x50 filtered mask with a tree block (sum 200) at col 0 and a non-tree block (sum 10) at col 50
fn two_block_mask ()->GrayImage {
    let mut img = GrayImage::new( 100, 50);
    img.put_pixel( 2, 2, Luma([200]));
    for x in 60..70 {
        img.put_pixel( x, 47, Luma([1]));
    }
    img
}

/// (x_min,y_min,x_max,y_max) of all pixels within the block interior (inside the outline) that match
fn ink_box<F> (img: &RgbImage, col: u32, row: u32, f: F)->Option<(u32,u32,u32,u32)> where F: Fn(&Rgb<u8>)->bool {
    let mut bbox: Option<(u32,u32,u32,u32)> = None;
    for y in row+3 .. row+47 {
        for x in col+3 .. col+47 {
            if f( img.get_pixel( x, y)) {
                bbox = Some( match bbox {
                    Some((x0,y0,x1,y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                    None => (x,y,x,y)
                });
            }
        }
    }
    bbox
}

fn assert_centered (bbox: (u32,u32,u32,u32), col: u32, row: u32) {
    let (x0,y0,x1,y1) = bbox;
    let cx = (x0 + x1) as f32 / 2.0;
    let cy = (y0 + y1) as f32 / 2.0;
    println!("label box {bbox:?}, center ({cx},{cy})");

    assert!( (cx - (col as f32 + 24.5)).abs() <= 1.0, "label not horizontally centered: {cx}");
    assert!( (cy - (row as f32 + 24.5)).abs() <= 1.0, "label not vertically centered: {cy}");
}

#[test]
fn test_classify_regions() {
    let blocks = classify_regions( &two_block_mask());
    assert_eq!( blocks.len(), 2);

    assert_eq!( blocks[0].as_row(), [0, 50, 0, 50, 200]);
    assert_eq!( blocks[0].class, BlockClass::Tree);

    assert_eq!( blocks[1].as_row(), [0, 50, 50, 100, 10]); // sum has to be strictly above threshold
    assert_eq!( blocks[1].class, BlockClass::NonTree);
}

#[test]
fn test_partial_blocks_skipped() {
    let img = GrayImage::from_pixel( 99, 149, Luma([255]));
    let blocks = classify_regions( &img);
    assert_eq!( blocks.len(), 2);
    assert!( blocks.iter().all( |b| b.is_tree() && b.value == 2500 * 255));
}

#[test]
fn test_annotate_outlines() {
    let filtered = two_block_mask();
    let img = annotate_regions( &filtered, &font(), 9.0).unwrap();
    assert_eq!( img.dimensions(), (100,50));

    // two pixel outline inside the tree block
    for (x,y) in [(0,0), (1,1), (49,49), (48,48), (25,0), (0,25), (49,10)] {
        assert_eq!( img.get_pixel( x, y), &GREEN, "pixel {x},{y}");
    }
    assert_eq!( img.get_pixel( 2, 2), &Rgb([200,200,200]));
    assert_eq!( img.get_pixel( 5, 45), &Rgb([0,0,0]));

    for (x,y) in [(50,0), (51,1), (99,49), (98,48)] {
        assert_eq!( img.get_pixel( x, y), &BLACK, "pixel {x},{y}");
    }
    assert_eq!( img.get_pixel( 60, 47), &Rgb([1,1,1]));
}

#[test]
fn test_labels_centered() {
    let filtered = two_block_mask();
    let img = annotate_regions( &filtered, &font(), 9.0).unwrap();

    // tree: white text on the (black) tree block. Anti-aliasing blends into gray values
    let tree_box = ink_box( &img, 0, 0, |p| p.0[0] > 0 && p.0[0] == p.0[1] && p.0[1] == p.0[2])
        .expect("no tree label");
    assert_centered( tree_box, 0, 0);
    let max_ink = (tree_box.1..=tree_box.3)
        .flat_map( |y| (tree_box.0..=tree_box.2).map( move |x| (x,y)))
        .map( |(x,y)| img.get_pixel( x, y).0[0])
        .max().unwrap();
    assert!( max_ink > 128);

    // non-tree: red text on the black block
    let nt_box = ink_box( &img, 50, 0, |p| p.0[0] > 0 && p.0[1] == 0 && p.0[2] == 0)
        .expect("no NT label");
    assert_centered( nt_box, 50, 0);

    // no red in the tree block, no gray/white text in the non-tree block
    assert!( ink_box( &img, 0, 0, |p| p.0[0] > 0 && p.0[1] == 0).is_none());
    assert!( ink_box( &img, 50, 0, |p| p.0[1] > 1).is_none());
}

#[test]
fn test_labels_on_unaligned_blocks() {
    let mut img = RgbImage::new( 150, 150);
    let blocks = vec![ Block::new( 100, 50, 11, BlockClass::Tree) ];
    draw_blocks( &mut img, &blocks, &font(), 9.0).unwrap();

    let bbox = ink_box( &img, 50, 100, |p| p.0[0] > 0 && p.0[0] == p.0[1] && p.0[1] == p.0[2]).expect("no label");
    assert_centered( bbox, 50, 100);
    assert!( img.get_pixel( 10, 10) == &BLACK);
}

#[test]
fn test_block_colors() {
    assert_eq!( block_colors( BlockClass::Tree), (GREEN, WHITE));
    assert_eq!( block_colors( BlockClass::NonTree), (BLACK, RED));
}

#[test]
fn test_block_outside_image() {
    let mut img = RgbImage::new( 80, 80);
    let blocks = vec![ Block::new( 0, 50, 0, BlockClass::NonTree) ];
    match draw_blocks( &mut img, &blocks, &font(), 9.0) {
        Err( CanopyImageError::IllegalArgument(msg)) => println!("expected error: {msg}"),
        other => panic!("expected IllegalArgument, got {:?}", other.err())
    }
}

#[test]
fn test_invalid_pt_size() {
    let font = font();
    let filtered = two_block_mask();
    for pt_size in [0.0, -1.0, f32::NAN] {
        assert!( matches!( annotate_regions( &filtered, &font, pt_size), Err(CanopyImageError::IllegalArgument(_))));
    }
}

#[test]
fn test_font_errors() {
    let tmp = tempfile::tempdir().unwrap();

    let missing = tmp.path().join("missing.ttf");
    assert!( matches!( load_font( &missing), Err(CanopyImageError::NotFoundError(_))));

    let garbage = tmp.path().join("garbage.ttf");
    std::fs::write( &garbage, b"this is not a font").unwrap();
    assert!( matches!( load_font( &garbage), Err(CanopyImageError::InvalidFont(_))));

    // explicitly configured fonts have to exist
    let config = PipelineConfig { font: Some(missing), ..PipelineConfig::default() };
    assert!( matches!( load_label_font( &config), Err(CanopyImageError::NotFoundError(_))));

    // without a configured font we always get the default
    assert!( load_label_font( &PipelineConfig::default()).is_ok());
}
