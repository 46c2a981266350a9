//! In-memory editing of the activity catalog before it is saved.

use crate::errors::LedgerError;
use crate::models::{
    leading_number, ActivityKind, Configuration, GainActivity, LossActivity,
    DEFAULT_MAX_PER_WEEK,
};
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

/// Oldest drafts are dropped once this many are open.
pub const MAX_OPEN_DRAFTS: usize = 16;

/// Working copy of the catalog. Edits stay local until the whole draft is
/// written back as the new configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogDraft {
    config: Configuration,
}

impl CatalogDraft {
    pub fn from_config(config: Configuration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn add_gain(
        &mut self,
        name: &str,
        points: &str,
        max_per_week: Option<&str>,
    ) -> Result<&GainActivity, LedgerError> {
        self.add_gain_at(name, points, max_per_week, Utc::now().timestamp_millis())
    }

    pub fn add_loss(&mut self, name: &str, points: &str) -> Result<&LossActivity, LedgerError> {
        self.add_loss_at(name, points, Utc::now().timestamp_millis())
    }

    pub fn add_gain_at(
        &mut self,
        name: &str,
        points: &str,
        max_per_week: Option<&str>,
        created_millis: i64,
    ) -> Result<&GainActivity, LedgerError> {
        let (name, points) = validate(name, points)?;
        let id = activity_id(&name, created_millis);
        self.config.gains.push(GainActivity {
            id,
            name,
            points,
            max_per_week: parse_max_per_week(max_per_week),
        });
        Ok(&self.config.gains[self.config.gains.len() - 1])
    }

    pub fn add_loss_at(
        &mut self,
        name: &str,
        points: &str,
        created_millis: i64,
    ) -> Result<&LossActivity, LedgerError> {
        let (name, points) = validate(name, points)?;
        let id = activity_id(&name, created_millis);
        self.config.losses.push(LossActivity { id, name, points });
        Ok(&self.config.losses[self.config.losses.len() - 1])
    }

    /// Drops the entry at `index`. Logged events for it are left alone.
    pub fn remove(&mut self, kind: ActivityKind, index: usize) -> Result<String, LedgerError> {
        let len = match kind {
            ActivityKind::Gain => self.config.gains.len(),
            ActivityKind::Loss => self.config.losses.len(),
        };
        if index >= len {
            return Err(LedgerError::NotFound(format!(
                "no {kind} activity at position {index}"
            )));
        }
        let removed = match kind {
            ActivityKind::Gain => self.config.gains.remove(index).id,
            ActivityKind::Loss => self.config.losses.remove(index).id,
        };
        Ok(removed)
    }
}

/// One draft per editor, each started from the saved document, so an
/// editor never sees another editor's unsaved changes.
#[derive(Debug, Default)]
pub struct DraftSessions {
    drafts: HashMap<String, CatalogDraft>,
    opened: VecDeque<String>,
}

impl DraftSessions {
    pub fn open(&mut self, saved: Configuration) -> String {
        let id = Uuid::new_v4().to_string();
        self.drafts.insert(id.clone(), CatalogDraft::from_config(saved));
        self.opened.push_back(id.clone());
        while self.opened.len() > MAX_OPEN_DRAFTS {
            if let Some(oldest) = self.opened.pop_front() {
                self.drafts.remove(&oldest);
            }
        }
        id
    }

    pub fn get(&self, id: &str) -> Result<&CatalogDraft, LedgerError> {
        self.drafts.get(id).ok_or_else(|| unknown_draft(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut CatalogDraft, LedgerError> {
        self.drafts.get_mut(id).ok_or_else(|| unknown_draft(id))
    }
}

fn unknown_draft(id: &str) -> LedgerError {
    LedgerError::NotFound(format!("no open draft '{id}'; reload the editor"))
}

fn validate(name: &str, points: &str) -> Result<(String, f64), LedgerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("name is required"));
    }
    let points = parse_points(points)
        .ok_or_else(|| LedgerError::validation("points must be a number"))?;
    if points < 0.0 {
        return Err(LedgerError::validation("points must not be negative"));
    }
    Ok((name.to_string(), points))
}

/// Accepts `12.5` as well as `12,5`.
pub fn parse_points(input: &str) -> Option<f64> {
    leading_number(&input.trim().replacen(',', ".", 1)).filter(|value| value.is_finite())
}

pub fn parse_max_per_week(input: Option<&str>) -> u32 {
    input
        .and_then(leading_integer)
        .filter(|value| *value >= 1)
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(DEFAULT_MAX_PER_WEEK)
}

fn leading_integer(input: &str) -> Option<i64> {
    let input = input.trim_start();
    let sign_len = usize::from(input.starts_with(['+', '-']));
    let digits = input[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    input[..sign_len + digits].parse().ok()
}

/// `Leitura diária` created at 1700000000000 becomes
/// `leitura_diaria_1700000000000`.
pub fn activity_id(name: &str, created_millis: i64) -> String {
    let folded: String = name
        .to_lowercase()
        .chars()
        .map(fold_diacritic)
        .collect();
    let slug = folded.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{slug}_{created_millis}")
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => 'c',
        'ď' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'ñ' | 'ń' | 'ň' | 'ņ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'š' | 'ş' | 'ŝ' => 's',
        'ť' | 'ţ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}
