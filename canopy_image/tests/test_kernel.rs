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
use canopy_image::kernel::{gated_convolution, kernel_weight_count, window_response, KERNEL, KERNEL_SIZE};

fn row_mask (w: u32, h: u32, row: u32)->GrayImage {
    GrayImage::from_fn( w, h, |_,y| Luma([ if y == row { 255 } else { 0 } ]))
}

#[test]
fn test_kernel_shape() {
    assert_eq!( kernel_weight_count(), 25);
    for i in 0..KERNEL_SIZE as usize {
        assert_eq!( KERNEL[3][i], 1);
        assert_eq!( KERNEL[i][3], 1);
        assert_eq!( KERNEL[i][i], 1);
        assert_eq!( KERNEL[i][6-i], 1);
    }
}

#[test]
fn test_single_window() {
    let mask = row_mask( 7, 7, 3);
    assert!( (window_response( &mask, 0, 0) - 7.0 * 255.0 / 49.0).abs() < 1e-9);

    let filtered = gated_convolution( &mask);
    assert_eq!( filtered.get_pixel( 3, 3).0[0], 36); // 36.43 truncated

    for x in 0..7 {
        if x != 3 { assert_eq!( filtered.get_pixel( x, 3).0[0], 255); }
    }
    for y in 0..7 {
        if y != 3 { assert_eq!( filtered.get_pixel( 3, y).0[0], 0); }
    }
}

#[test]
fn test_in_place_update() {
    // the second window (j=1) sees the center value already written by the first one
    let mask = row_mask( 8, 7, 3);
    let filtered = gated_convolution( &mask);

    assert_eq!( filtered.get_pixel( 3, 3).0[0], 36);
    assert_eq!( filtered.get_pixel( 4, 3).0[0], 31); // (6*255 + 36)/49 = 31.96
    for x in [0,1,2,5,6,7] {
        assert_eq!( filtered.get_pixel( x, 3).0[0], 255);
    }
}

#[test]
fn test_gate() {
    // all weights on: 25*255/49 = 130.1 is above the gate
    let full = GrayImage::from_pixel( 7, 7, Luma([255]));
    let filtered = gated_convolution( &full);
    assert_eq!( filtered.get_pixel( 3, 3).0[0], 0);
    assert_eq!( filtered.get_pixel( 0, 0).0[0], 255);

    // single center pixel: 255/49 = 5.2 is below the gate
    let mut single = GrayImage::new( 7, 7);
    single.put_pixel( 3, 3, Luma([255]));
    let filtered = gated_convolution( &single);
    assert!( filtered.pixels().all( |p| p.0[0] == 0));
}

#[test]
fn test_small_mask() {
    let mask = GrayImage::from_fn( 6, 9, |x,y| Luma([ ((x + y) * 20) as u8 ]));
    let filtered = gated_convolution( &mask);
    assert_eq!( filtered, mask);
}

#[test]
fn test_empty_mask() {
    let mask = GrayImage::new( 20, 15);
    let filtered = gated_convolution( &mask);
    assert_eq!( filtered.dimensions(), (20,15));
    assert!( filtered.pixels().all( |p| p.0[0] == 0));
}
