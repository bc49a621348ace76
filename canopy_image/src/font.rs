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

//! font resources for block labels. The default font is compiled into the crate so that labels
//! do not depend on fonts installed on the host

use std::{env, path::{Path,PathBuf}};
use ab_glyph::FontVec;
use tracing::debug;
use canopy_common::fs::filepath_contents;
use crate::{config::PipelineConfig, errors::{CanopyImageError, Result}};

pub const DEFAULT_FONT_NAME: &'static str = "DejaVuSansMono.ttf"; // see data/LICENSE-DejaVu

/// env var to override the directory in which we look for the default font
pub const FONT_DIR_ENV: &'static str = "CANOPY_FONT_DIR";

const EMBEDDED_DEFAULT_FONT: &'static [u8] = include_bytes!("../data/DejaVuSansMono.ttf");

pub fn load_font<P> (path: P)->Result<FontVec> where P: AsRef<Path> {
    let path = path.as_ref();
    if !path.is_file() {
        Err( CanopyImageError::NotFoundError(format!("font {:?}", path)) )

    } else {
        let data = filepath_contents( &path)?;
        Ok( FontVec::try_from_vec( data)? )
    }
}

/// DEFAULT_FONT_NAME in $CANOPY_FONT_DIR, if that is set and has it
pub fn font_dir_override ()->Option<PathBuf> {
    env::var( FONT_DIR_ENV).ok()
        .map( |dir| PathBuf::from(dir).join( DEFAULT_FONT_NAME))
        .filter( |path| path.is_file())
}

/// the font dir override if there is one, the embedded font otherwise
pub fn load_default_font ()->Result<FontVec> {
    if let Some(path) = font_dir_override() {
        debug!("using label font {:?}", path);
        load_font( path)
    } else {
        Ok( FontVec::try_from_vec( EMBEDDED_DEFAULT_FONT.to_vec())? )
    }
}

/// an explicitly configured font has to exist. Otherwise we use the default font
pub fn load_label_font (config: &PipelineConfig)->Result<FontVec> {
    match &config.font {
        Some(path) => load_font( path),
        None => load_default_font()
    }
}
