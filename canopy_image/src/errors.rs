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

use canopy_common::define_error;

pub type Result<T> = std::result::Result<T, CanopyImageError>;

/// the processing stages we report in errors and logs
#[derive(Debug,Clone,Copy,PartialEq,Eq,strum::Display)]
pub enum Stage {
    #[strum(to_string="input decoding")] Decode,
    #[strum(to_string="channel normalization")] Normalize,
    #[strum(to_string="vegetation index")] Index,
    #[strum(to_string="gated convolution")] Convolve,
    #[strum(to_string="block aggregation")] Aggregate,
    #[strum(to_string="region annotation")] Annotate,
    #[strum(to_string="artifact output")] Output,
}

define_error!{ pub CanopyImageError =
    ImageError(#[from] image::ImageError) : "Image error {0}",
    IOError(#[from] std::io::Error) : "IO error: {0}",
    SerdeError(#[from] serde_json::Error) : "serialization/deserialization error: {0}",
    ConfigError(#[from] ron::error::SpannedError) : "config error: {0}",
    InvalidFont( #[from] ab_glyph::InvalidFont) : "Invalid font error: {0}",
    DecodeError(String) : "cannot decode input image: {0}",
    StageFailed(Stage,String) : "{0} failed: {1}",
    InvalidImageFormat(String) : "invalid image format: {0}",
    IllegalArgument(String) : "illegal argument: {0}",
    NotFoundError(String) : "not found: {0}"
}
