//! Minimal FIT file writer for integration tests
//!
//! Produces just enough of the format for a decoder to find a `file_id`
//! and (optionally) a `session` message.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z)
const FIT_EPOCH_OFFSET: i64 = 631_065_600;

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

const BASE_ENUM: u8 = 0x00;
const BASE_SINT8: u8 = 0x01;
const BASE_UINT8: u8 = 0x02;
const BASE_UINT16: u8 = 0x84;
const BASE_UINT32: u8 = 0x86;

const SPORT_RUNNING: u8 = 1;
const SPORT_CYCLING: u8 = 2;

/// Session values to encode. `None` fields are left out of the message.
#[derive(Debug, Clone)]
pub struct SessionSpec {
    pub start: NaiveDateTime,
    pub sport: u8,
    pub sub_sport: u8,
    pub distance_m: Option<f64>,
    pub timer_secs: Option<f64>,
    pub avg_hr: Option<u8>,
    pub max_hr: Option<u8>,
    pub avg_cadence: Option<u8>,
    pub calories: Option<u16>,
    pub temperature: Option<i8>,
}

impl SessionSpec {
    /// A run at noon UTC on the given day
    pub fn run(date: NaiveDate, distance_m: f64, timer_secs: f64) -> Self {
        Self {
            start: noon(date),
            sport: SPORT_RUNNING,
            sub_sport: 0,
            distance_m: Some(distance_m),
            timer_secs: Some(timer_secs),
            avg_hr: Some(150),
            max_hr: Some(172),
            avg_cadence: Some(84),
            calories: Some(620),
            temperature: Some(18),
        }
    }

    pub fn ride(date: NaiveDate, distance_m: f64, timer_secs: f64) -> Self {
        Self {
            sport: SPORT_CYCLING,
            avg_cadence: Some(88),
            ..Self::run(date, distance_m, timer_secs)
        }
    }

    pub fn without_heart_rate(mut self) -> Self {
        self.avg_hr = None;
        self.max_hr = None;
        self
    }
}

pub fn noon(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(12, 0, 0).unwrap()
}

fn fit_time(at: NaiveDateTime) -> u32 {
    (at.and_utc().timestamp() - FIT_EPOCH_OFFSET) as u32
}

fn crc_byte(crc: u16, byte: u8) -> u16 {
    let mut tmp = CRC_TABLE[(crc & 0xF) as usize];
    let mut crc = (crc >> 4) & 0x0FFF;
    crc = crc ^ tmp ^ CRC_TABLE[(byte & 0xF) as usize];

    tmp = CRC_TABLE[(crc & 0xF) as usize];
    crc = (crc >> 4) & 0x0FFF;
    crc ^ tmp ^ CRC_TABLE[((byte >> 4) & 0xF) as usize]
}

fn crc(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0, |acc, b| crc_byte(acc, *b))
}

/// Field definition plus its little-endian value bytes
struct Field {
    num: u8,
    base_type: u8,
    bytes: Vec<u8>,
}

impl Field {
    fn new(num: u8, base_type: u8, bytes: Vec<u8>) -> Self {
        Self {
            num,
            base_type,
            bytes,
        }
    }

    fn u8(num: u8, base_type: u8, value: u8) -> Self {
        Self::new(num, base_type, vec![value])
    }

    fn u16(num: u8, value: u16) -> Self {
        Self::new(num, BASE_UINT16, value.to_le_bytes().to_vec())
    }

    fn u32(num: u8, value: u32) -> Self {
        Self::new(num, BASE_UINT32, value.to_le_bytes().to_vec())
    }
}

fn push_message(data: &mut Vec<u8>, local: u8, global: u16, fields: &[Field]) {
    // Definition
    data.push(0x40 | local);
    data.push(0);
    data.push(0);
    data.extend_from_slice(&global.to_le_bytes());
    data.push(fields.len() as u8);
    for field in fields {
        data.push(field.num);
        data.push(field.bytes.len() as u8);
        data.push(field.base_type);
    }

    // Data
    data.push(local);
    for field in fields {
        data.extend_from_slice(&field.bytes);
    }
}

fn file_id(created: NaiveDateTime) -> Vec<Field> {
    vec![
        Field::u8(0, BASE_ENUM, 4),
        Field::u16(1, 1),
        Field::u32(4, fit_time(created)),
    ]
}

fn session_fields(spec: &SessionSpec) -> Vec<Field> {
    let start = fit_time(spec.start);
    let mut fields = vec![
        Field::u32(253, start + spec.timer_secs.unwrap_or(0.0) as u32),
        Field::u32(2, start),
        Field::u8(5, BASE_ENUM, spec.sport),
        Field::u8(6, BASE_ENUM, spec.sub_sport),
    ];
    if let Some(secs) = spec.timer_secs {
        let scaled = (secs * 1000.0).round() as u32;
        fields.push(Field::u32(7, scaled));
        fields.push(Field::u32(8, scaled));
    }
    if let Some(meters) = spec.distance_m {
        fields.push(Field::u32(9, (meters * 100.0).round() as u32));
    }
    if let Some(calories) = spec.calories {
        fields.push(Field::u16(11, calories));
    }
    if let Some(hr) = spec.avg_hr {
        fields.push(Field::u8(16, BASE_UINT8, hr));
    }
    if let Some(hr) = spec.max_hr {
        fields.push(Field::u8(17, BASE_UINT8, hr));
    }
    if let Some(cadence) = spec.avg_cadence {
        fields.push(Field::u8(18, BASE_UINT8, cadence));
    }
    if let Some(temp) = spec.temperature {
        fields.push(Field::new(57, BASE_SINT8, vec![temp as u8]));
    }
    fields
}

fn wrap(data: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 16);
    out.push(14);
    out.push(0x10);
    out.extend_from_slice(&2132u16.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(b".FIT");
    let header_crc = crc(&out);
    out.extend_from_slice(&header_crc.to_le_bytes());

    out.extend_from_slice(&data);
    let file_crc = crc(&out);
    out.extend_from_slice(&file_crc.to_le_bytes());
    out
}

/// Encode a complete activity file with one session message
pub fn encode_activity(spec: &SessionSpec) -> Vec<u8> {
    let mut data = Vec::new();
    push_message(&mut data, 0, 0, &file_id(spec.start));
    push_message(&mut data, 1, 18, &session_fields(spec));
    wrap(data)
}

/// Encode a valid file that carries no session message
pub fn encode_without_session(created: NaiveDateTime) -> Vec<u8> {
    let mut data = Vec::new();
    push_message(&mut data, 0, 0, &file_id(created));
    wrap(data)
}

pub fn write_activity(dir: &Path, name: &str, spec: &SessionSpec) -> PathBuf {
    write_bytes(dir, name, &encode_activity(spec))
}

pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
