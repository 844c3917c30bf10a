//! `World` implementation over [`VirtualFilesystem`]
//!
//! Request inputs become `sys.inputs`; the clock is frozen when the world is
//! created so one compilation sees a single "today".

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Array, Bytes, Datetime, Dict, Value};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, World};

use super::fonts::{global_font_cache, FontCache};
use super::virtual_fs::VirtualFilesystem;
use crate::compiler::errors::RenderError;

pub struct VirtualWorld {
    filesystem: VirtualFilesystem,
    font_cache: &'static FontCache,
    time: DateTime<Utc>,
    library: LazyHash<Library>,
}

impl VirtualWorld {
    pub fn new(
        source: String,
        inputs: HashMap<String, serde_json::Value>,
        assets: HashMap<String, Vec<u8>>,
    ) -> Result<Self, RenderError> {
        let mut filesystem = VirtualFilesystem::new(source);
        for (path, content) in assets {
            filesystem.mount_file(&path, Bytes::from(content))?;
        }

        let mut dict = Dict::new();
        for (key, value) in &inputs {
            dict.insert(key.as_str().into(), json_to_value(value)?);
        }

        Ok(Self {
            filesystem,
            font_cache: global_font_cache(),
            library: LazyHash::new(Library::builder().with_inputs(dict).build()),
            time: Utc::now(),
        })
    }
}

/// Convert JSON into the equivalent Typst value
fn json_to_value(json: &serde_json::Value) -> Result<Value, RenderError> {
    Ok(match json {
        serde_json::Value::Null => Value::None,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::Int(i),
            (None, Some(f)) => Value::Float(f),
            _ => return Err(RenderError::InvalidInput(format!("Invalid number: {}", n))),
        },
        serde_json::Value::String(s) => Value::Str(s.as_str().into()),
        serde_json::Value::Array(items) => Value::Array(
            items
                .iter()
                .map(json_to_value)
                .collect::<Result<Array, _>>()?,
        ),
        serde_json::Value::Object(fields) => {
            let mut dict = Dict::new();
            for (key, value) in fields {
                dict.insert(key.as_str().into(), json_to_value(value)?);
            }
            Value::Dict(dict)
        }
    })
}

impl World for VirtualWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        self.font_cache.book()
    }

    fn main(&self) -> FileId {
        self.filesystem.main_id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        self.filesystem
            .get_source(id)
            .ok_or_else(|| FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        self.filesystem
            .get_file(id)
            .cloned()
            .ok_or_else(|| FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.font_cache.font(index)
    }

    fn today(&self, offset: Option<i64>) -> Option<Datetime> {
        let adjusted = self.time + chrono::Duration::hours(offset.unwrap_or(0));
        Datetime::from_ymd_hms(
            adjusted.year(),
            adjusted.month() as u8,
            adjusted.day() as u8,
            adjusted.hour() as u8,
            adjusted.minute() as u8,
            adjusted.second() as u8,
        )
    }
}
