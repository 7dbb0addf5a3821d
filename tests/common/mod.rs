//! Test fixtures shared by the integration tests.

#![allow(dead_code)]

use byteorder::{ByteOrder, WriteBytesExt};

/// One page of a synthetic single-sample TIFF.
pub struct TestPage {
    pub width: u32,
    pub height: u32,
    pub bits: u16,
    pub pixels: Vec<u16>,
    pub description: Option<String>,
}

impl TestPage {
    pub fn gradient16(width: u32, height: u32, description: Option<&str>) -> Self {
        let pixels = (0..width * height)
            .map(|i| ((i * 4099) % 65536) as u16)
            .collect();
        Self {
            width,
            height,
            bits: 16,
            pixels,
            description: description.map(str::to_string),
        }
    }
}

fn entry<B: ByteOrder>(out: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: u32) {
    out.write_u16::<B>(tag).unwrap();
    out.write_u16::<B>(field_type).unwrap();
    out.write_u32::<B>(count).unwrap();
    if field_type == 3 && count == 1 {
        out.write_u16::<B>(value as u16).unwrap();
        out.write_u16::<B>(0).unwrap();
    } else {
        out.write_u32::<B>(value).unwrap();
    }
}

/// Build an uncompressed strip-based TIFF in byte order `B`.
pub fn build_tiff<B: ByteOrder>(pages: &[TestPage]) -> Vec<u8> {
    let little = B::read_u16(&[1, 0]) == 1;
    let mut out = Vec::new();
    out.extend_from_slice(if little { b"II" } else { b"MM" });
    out.write_u16::<B>(42).unwrap();
    let mut next_pointer_at = out.len();
    out.write_u32::<B>(0).unwrap();

    for page in pages {
        let strip_offset = out.len() as u32;
        for &p in &page.pixels {
            if page.bits == 8 {
                out.push(p as u8);
            } else {
                out.write_u16::<B>(p).unwrap();
            }
        }
        let strip_len = out.len() as u32 - strip_offset;
        if out.len() % 2 == 1 {
            out.push(0);
        }

        let desc = page.description.as_ref().map(|d| {
            let offset = out.len() as u32;
            out.extend_from_slice(d.as_bytes());
            out.push(0);
            if out.len() % 2 == 1 {
                out.push(0);
            }
            (offset, d.len() as u32 + 1)
        });

        let ifd_offset = out.len() as u32;
        B::write_u32(&mut out[next_pointer_at..next_pointer_at + 4], ifd_offset);

        let count = if desc.is_some() { 10 } else { 9 };
        out.write_u16::<B>(count).unwrap();
        entry::<B>(&mut out, 256, 4, 1, page.width);
        entry::<B>(&mut out, 257, 4, 1, page.height);
        entry::<B>(&mut out, 258, 3, 1, page.bits as u32);
        entry::<B>(&mut out, 259, 3, 1, 1);
        entry::<B>(&mut out, 262, 3, 1, 1);
        if let Some((offset, len)) = desc {
            entry::<B>(&mut out, 270, 2, len, offset);
        }
        entry::<B>(&mut out, 273, 4, 1, strip_offset);
        entry::<B>(&mut out, 277, 3, 1, 1);
        entry::<B>(&mut out, 278, 4, 1, page.height);
        entry::<B>(&mut out, 279, 4, 1, strip_len);
        next_pointer_at = out.len();
        out.write_u32::<B>(0).unwrap();
    }
    out
}

pub const SCAN_CSV: &str = "\
Well,ImageFileName,ExcitationEmissionFilter,PositionXUm,PositionYUm,PositionZUm,SiteId
A01,p1_A01_s1_w1.tif,DAPI,100.5,200.0,0.0,1
A01,p1_A01_s1_w2.tif,FITC,100.5,200.0,0.0,1
B03,p1_B03_s2_w1.tif,DAPI,18100.5,9200.0,0.5,2
";

pub const SESSION_JDCE: &str = r#"{
  "Version": "1.0",
  "ImageStack": {
    "Uuid": "abc",
    "AutoLeadAcquisitionProtocol": {
      "Wavelengths": [{"Index": 1, "EmissionFilter": "DAPI"}]
    },
    "ImageMetadataFiles": ["a.xml"]
  }
}"#;

pub const PROTOCOL_JSON: &str = r#"{
  "acquisitionEngineProtocol": {
    "commandId": "X1",
    "protocolDefinition": {"protocolName": "P1"}
  },
  "uiModel": {"cameraName": "Zyla"}
}"#;
