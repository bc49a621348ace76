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

use std::path::{Path,PathBuf};
use serde::{Serialize,Deserialize};
use canopy_common::fs::filepath_contents_as_string;
use crate::errors::{CanopyImageError, Result};

/// how the annotated image gets its blocks
#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize,strum::Display,strum::EnumString)]
#[strum(serialize_all="lowercase")]
pub enum ClassificationMode {
    /// annotation re-scans the un-resized filtered mask and uses the intensity sum rule,
    /// the block grid aggregation is only reported
    #[default]
    Independent,

    /// annotation draws the blocks of the grid aggregation (active pixel count rule) over the resized mask
    Unified,
}

/// runtime options of the pipeline. Thresholds and the kernel are not configurable
#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub mode: ClassificationMode,

    /// TrueType font for block labels. If not set we use the default font
    pub font: Option<PathBuf>,

    pub label_pt_size: f32,

    /// write the block aggregation report as JSON
    pub save_block_report: bool,

    /// write the byte quantized vegetation index
    pub save_index_image: bool,
}

impl Default for PipelineConfig {
    fn default()->Self {
        PipelineConfig {
            mode: ClassificationMode::Independent,
            font: None,
            label_pt_size: 9.0,
            save_block_report: true,
            save_index_image: true,
        }
    }
}

impl PipelineConfig {
    pub fn load<P> (path: P)->Result<Self> where P: AsRef<Path> {
        let s = filepath_contents_as_string( &path.as_ref())?;
        Self::from_ron( &s)
    }

    pub fn from_ron (s: &str)->Result<Self> {
        let config: PipelineConfig = ron::from_str( s)?;
        config.check()?;
        Ok( config )
    }

    /// reject values we could not render with
    pub fn check (&self)->Result<()> {
        check_pt_size( self.label_pt_size)
    }
}

/// label font sizes have to be positive (and not NaN)
pub fn check_pt_size (pt_size: f32)->Result<()> {
    if pt_size > 0.0 && pt_size.is_finite() {
        Ok(())
    } else {
        Err( CanopyImageError::IllegalArgument( format!("invalid label font pt size {pt_size}")))
    }
}
