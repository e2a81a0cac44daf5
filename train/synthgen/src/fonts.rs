use std::{
    collections::BTreeMap,
    fs::read_dir,
    path::{Path, PathBuf},
};

use ab_glyph::{Font, FontArc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{error::GenerateError, params};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    Regular,
    Bold,
    ExtraBold,
}

impl FontWeight {
    /// Cumulative thresholds on a uniform draw: light 5%, extra-bold 35%, bold 40%,
    /// regular 20%.
    pub fn from_draw(u: f64) -> Self {
        if u <= 0.05 {
            FontWeight::Light
        } else if u <= 0.4 {
            FontWeight::ExtraBold
        } else if u <= 0.8 {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        }
    }

    /// Bucket an OpenType `usWeightClass`.
    pub fn from_weight_class(class: u16) -> Self {
        match class {
            0..=349 => FontWeight::Light,
            350..=549 => FontWeight::Regular,
            550..=749 => FontWeight::Bold,
            _ => FontWeight::ExtraBold,
        }
    }

    fn rank(self) -> u32 {
        self as u32
    }
}

pub struct FontFamily {
    name: String,
    faces: BTreeMap<FontWeight, FontArc>,
}

/// A loaded face plus the number of extra one-pixel-shifted passes needed to fake the
/// requested weight when the family has no face for it.
pub struct FaceChoice<'a> {
    pub font: &'a FontArc,
    pub faux_bold: u32,
}

impl FontFamily {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weights(&self) -> impl Iterator<Item = FontWeight> + '_ {
        self.faces.keys().copied()
    }

    pub fn face(&self, weight: FontWeight) -> Option<FaceChoice<'_>> {
        if let Some(font) = self.faces.get(&weight) {
            return Some(FaceChoice { font, faux_bold: 0 });
        }
        let (fallback, font) = self
            .faces
            .get_key_value(&FontWeight::Regular)
            .or_else(|| self.faces.iter().next())?;
        Some(FaceChoice {
            font,
            faux_bold: weight.rank().saturating_sub(fallback.rank()),
        })
    }
}

/// Immutable set of font families, built once and shared by reference.
pub struct FontSet {
    families: Vec<FontFamily>,
}

impl FontSet {
    /// Load every `.ttf`/`.otf` in `dir`, grouping faces into families by their name table.
    pub fn load_dir(dir: &Path) -> Result<Self, GenerateError> {
        let rd = read_dir(dir).map_err(|source| GenerateError::FontDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = rd
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|s| s.to_str()).map(str::to_ascii_lowercase).as_deref(),
                    Some("ttf") | Some("otf")
                )
            })
            .collect();
        // file system order is not stable across machines
        paths.sort();

        let mut grouped: BTreeMap<String, BTreeMap<FontWeight, FontArc>> = BTreeMap::new();
        for path in &paths {
            let Some((family, weight, font)) = load_face(path) else {
                continue;
            };
            let faces = grouped.entry(family.clone()).or_default();
            if faces.contains_key(&weight) {
                debug!(path = %path.display(), family, ?weight, "Duplicate weight, keeping first");
                continue;
            }
            faces.insert(weight, font);
        }

        let families: Vec<FontFamily> = grouped
            .into_iter()
            .map(|(name, faces)| FontFamily { name, faces })
            .collect();
        if families.is_empty() {
            return Err(GenerateError::NoFonts(dir.to_path_buf()));
        }
        info!(
            dir = %dir.display(),
            files = paths.len(),
            families = families.len(),
            "Loaded fonts"
        );
        Ok(Self { families })
    }

    /// One regular-weight family per font, in the given order.
    pub fn from_fonts(fonts: Vec<(String, FontArc)>) -> Result<Self, GenerateError> {
        let families: Vec<FontFamily> = fonts
            .into_iter()
            .filter(|(_, f)| covers_alphabets(f))
            .map(|(name, font)| FontFamily {
                name,
                faces: BTreeMap::from([(FontWeight::Regular, font)]),
            })
            .collect();
        if families.is_empty() {
            return Err(GenerateError::NoFonts(PathBuf::new()));
        }
        Ok(Self { families })
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    pub fn family(&self, index: usize) -> Option<&FontFamily> {
        self.families.get(index)
    }

    pub fn families(&self) -> &[FontFamily] {
        &self.families
    }
}

fn load_face(path: &Path) -> Option<(String, FontWeight, FontArc)> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read font");
            return None;
        }
    };

    let (family, weight) = match ttf_parser::Face::parse(&bytes, 0) {
        Ok(face) => (
            family_name(&face).unwrap_or_else(|| file_stem(path)),
            FontWeight::from_weight_class(face.weight().to_number()),
        ),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot parse font");
            return None;
        }
    };

    let font = match FontArc::try_from_vec(bytes) {
        Ok(f) => f,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Invalid font");
            return None;
        }
    };
    if !covers_alphabets(&font) {
        warn!(path = %path.display(), "Font lacks glyphs for the word alphabets, skipping");
        return None;
    }
    Some((family, weight, font))
}

fn family_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    let lookup = |id: u16| {
        face.names()
            .into_iter()
            .filter(|n| n.name_id == id)
            .find_map(|n| n.to_string())
    };
    lookup(ttf_parser::name_id::TYPOGRAPHIC_FAMILY).or_else(|| lookup(ttf_parser::name_id::FAMILY))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn covers_alphabets(font: &FontArc) -> bool {
    params::LETTERS
        .chars()
        .chain(params::DIGITS.chars())
        .all(|ch| font.glyph_id(ch).0 != 0)
}
