use std::sync::LazyLock;

use regex::Regex;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::media::public_url;

/// Named photo positions on an artist profile. Each slot holds at most one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoSlot {
    Headshot,
    SmilingHeadshot,
    FullBody,
    ThreeQuarter,
    Profile,
    ArtistDp,
}

impl PhotoSlot {
    /// Slots accepted by `PUT /artist/upload`.
    pub const GALLERY: [PhotoSlot; 5] = [
        PhotoSlot::Headshot,
        PhotoSlot::SmilingHeadshot,
        PhotoSlot::FullBody,
        PhotoSlot::ThreeQuarter,
        PhotoSlot::Profile,
    ];

    /// Multipart field name, also used as the stored file stem.
    pub fn field_name(self) -> &'static str {
        match self {
            PhotoSlot::Headshot => "headshot",
            PhotoSlot::SmilingHeadshot => "smilingHeadshot",
            PhotoSlot::FullBody => "fullBody",
            PhotoSlot::ThreeQuarter => "threeQuarter",
            PhotoSlot::Profile => "profile",
            PhotoSlot::ArtistDp => "artistDp",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        [PhotoSlot::ArtistDp]
            .into_iter()
            .chain(Self::GALLERY)
            .find(|slot| slot.field_name() == name)
    }
}

/// Slot name -> relative storage path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct Photos {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smiling_headshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub three_quarter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_dp: Option<String>,
}

impl Photos {
    fn slot_mut(&mut self, slot: PhotoSlot) -> &mut Option<String> {
        match slot {
            PhotoSlot::Headshot => &mut self.headshot,
            PhotoSlot::SmilingHeadshot => &mut self.smiling_headshot,
            PhotoSlot::FullBody => &mut self.full_body,
            PhotoSlot::ThreeQuarter => &mut self.three_quarter,
            PhotoSlot::Profile => &mut self.profile,
            PhotoSlot::ArtistDp => &mut self.artist_dp,
        }
    }

    pub fn get(&self, slot: PhotoSlot) -> Option<&str> {
        match slot {
            PhotoSlot::Headshot => self.headshot.as_deref(),
            PhotoSlot::SmilingHeadshot => self.smiling_headshot.as_deref(),
            PhotoSlot::FullBody => self.full_body.as_deref(),
            PhotoSlot::ThreeQuarter => self.three_quarter.as_deref(),
            PhotoSlot::Profile => self.profile.as_deref(),
            PhotoSlot::ArtistDp => self.artist_dp.as_deref(),
        }
    }

    /// Point `slot` at `path`, returning the path it previously held.
    /// Every other slot is left as it was.
    pub fn replace(&mut self, slot: PhotoSlot, path: String) -> Option<String> {
        self.slot_mut(slot).replace(path)
    }

    /// The same mapping with every path turned into a fetchable URL.
    pub fn resolve(&self, base_url: &str) -> Photos {
        let url = |p: &Option<String>| p.as_deref().map(|p| public_url(base_url, p));
        Photos {
            headshot: url(&self.headshot),
            smiling_headshot: url(&self.smiling_headshot),
            full_body: url(&self.full_body),
            three_quarter: url(&self.three_quarter),
            profile: url(&self.profile),
            artist_dp: url(&self.artist_dp),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Skills(pub Vec<String>);

impl Skills {
    /// Trimmed, empty entries dropped, duplicates removed keeping first occurrence.
    pub fn normalize(raw: Vec<String>) -> Self {
        let mut out: Vec<String> = Vec::with_capacity(raw.len());
        for skill in raw {
            let skill = skill.trim().to_string();
            if !skill.is_empty() && !out.iter().any(|s| s.eq_ignore_ascii_case(&skill)) {
                out.push(skill);
            }
        }
        Skills(out)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PastProject {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub project_name: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
    #[validate(url(message = "Enter a valid work link"))]
    pub work_link: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PastProjects(pub Vec<PastProject>);

/// Languages a monologue link can be submitted for, in stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonologueLanguage {
    Haryanvi,
    Rajasthani,
    Bhojpuri,
    Awadhi,
    Maithili,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monologue {
    pub language: MonologueLanguage,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Monologues(pub Vec<Monologue>);

/// Gender options on the personal section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// SeaORM entity for the `artist_profiles` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The owning user. Unique: the only key profiles are mutated by.
    #[sea_orm(unique)]
    pub user_id: Uuid,
    /// Contact address copied from the owner at creation; never a lookup key.
    pub email: String,

    pub full_name: Option<String>,
    pub whatsapp: Option<String>,
    pub calling: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub short_bio: Option<String>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub home_city: Option<String>,
    pub home_state: Option<String>,
    pub current_city: Option<String>,
    pub current_state: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub instagram: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub youtube: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub twitter: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub linkedin: Option<String>,

    pub talent_category: Option<String>,
    pub height: Option<String>,
    pub age: Option<i32>,
    pub screen_age: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub video_reel: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub skills: Skills,
    #[sea_orm(column_type = "JsonBinary")]
    pub past_projects: PastProjects,

    #[sea_orm(column_type = "JsonBinary")]
    pub photos: Photos,
    #[sea_orm(column_type = "JsonBinary")]
    pub monologues: Monologues,

    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Personal info is the first section; nothing else may be stored before it.
    pub fn has_personal_info(&self) -> bool {
        self.full_name.is_some()
    }
}

// ── DTOs ──

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,15}$").expect("valid phone regex"));

static HEIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2,3}\s?(cm|in)?$").expect("valid height regex"));

/// Body of `POST|PUT /artist/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[validate(length(min = 2, max = 50, message = "Full name must be 2 to 50 characters"))]
    pub full_name: String,
    #[validate(regex(path = *PHONE_RE, message = "Enter a valid phone number"))]
    pub whatsapp: String,
    #[validate(regex(path = *PHONE_RE, message = "Enter a valid phone number"))]
    pub calling: String,
    #[validate(length(min = 10, max = 300, message = "Short bio must be 10 to 300 characters"))]
    pub short_bio: String,
    pub gender: Gender,
    #[validate(length(min = 1, message = "Language is required"))]
    pub language: String,
    #[validate(length(min = 1, message = "Home city is required"))]
    pub home_city: String,
    #[validate(length(min = 1, message = "Home state is required"))]
    pub home_state: String,
    #[validate(length(min = 1, message = "Current city is required"))]
    pub current_city: String,
    #[validate(length(min = 1, message = "Current state is required"))]
    pub current_state: String,
    #[validate(url(message = "Enter a valid URL"))]
    pub instagram: String,
    #[validate(url(message = "Enter a valid URL"))]
    pub youtube: String,
    #[validate(url(message = "Enter a valid URL"))]
    pub twitter: String,
    #[validate(url(message = "Enter a valid URL"))]
    pub linkedin: String,
}

impl PersonalInfo {
    /// Overwrite the personal section of `profile`. Applying the same payload
    /// twice leaves the profile unchanged.
    pub fn apply_to(&self, profile: &mut Model) {
        profile.full_name = Some(self.full_name.trim().to_string());
        profile.whatsapp = Some(self.whatsapp.clone());
        profile.calling = Some(self.calling.clone());
        profile.short_bio = Some(self.short_bio.clone());
        profile.gender = Some(self.gender.as_str().to_string());
        profile.language = Some(self.language.clone());
        profile.home_city = Some(self.home_city.clone());
        profile.home_state = Some(self.home_state.clone());
        profile.current_city = Some(self.current_city.clone());
        profile.current_state = Some(self.current_state.clone());
        profile.instagram = Some(self.instagram.clone());
        profile.youtube = Some(self.youtube.clone());
        profile.twitter = Some(self.twitter.clone());
        profile.linkedin = Some(self.linkedin.clone());
    }
}

/// Each submitted skill needs at least two characters. Blank entries are
/// dropped later by [`Skills::normalize`] and pass here.
pub fn validate_skill_names(skills: &[String]) -> Result<(), ValidationError> {
    let too_short = skills
        .iter()
        .map(|s| s.trim())
        .any(|s| !s.is_empty() && s.chars().count() < 2);
    if too_short {
        Err(ValidationError::new("skill_length")
            .with_message("Each skill must be at least 2 characters".into()))
    } else {
        Ok(())
    }
}

/// Body of `PUT /artist/professional`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalInfo {
    #[validate(length(min = 1, message = "Talent category is required"))]
    pub talent_category: String,
    #[validate(regex(path = *HEIGHT_RE, message = "Enter valid height like 170 cm"))]
    pub height: String,
    #[validate(range(min = 1, max = 100, message = "Age must be between 1 and 100"))]
    pub age: i32,
    #[validate(range(min = 1, max = 100, message = "Screen age must be between 1 and 100"))]
    pub screen_age: i32,
    #[validate(url(message = "Enter a valid video URL"))]
    pub video_reel: String,
    #[validate(
        length(min = 1, message = "Select at least one skill"),
        custom(function = "validate_skill_names")
    )]
    pub skills: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub past_projects: Vec<PastProject>,
}

impl ProfessionalInfo {
    pub fn apply_to(&self, profile: &mut Model) {
        profile.talent_category = Some(self.talent_category.clone());
        profile.height = Some(self.height.clone());
        profile.age = Some(self.age);
        profile.screen_age = Some(self.screen_age);
        profile.video_reel = Some(self.video_reel.clone());
        profile.skills = Skills::normalize(self.skills.clone());
        profile.past_projects = PastProjects(self.past_projects.clone());
    }
}

/// Body of `PUT /artist/monologue`. Each submission replaces the whole set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MonologueLinks {
    #[validate(url(message = "Enter a valid URL"))]
    pub haryanvi: Option<String>,
    #[validate(url(message = "Enter a valid URL"))]
    pub rajasthani: Option<String>,
    #[validate(url(message = "Enter a valid URL"))]
    pub bhojpuri: Option<String>,
    #[validate(url(message = "Enter a valid URL"))]
    pub awadhi: Option<String>,
    #[validate(url(message = "Enter a valid URL"))]
    pub maithili: Option<String>,
}

impl MonologueLinks {
    /// Empty strings count as "not submitted" and are checked before `validate`.
    pub fn without_blanks(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            haryanvi: keep(self.haryanvi),
            rajasthani: keep(self.rajasthani),
            bhojpuri: keep(self.bhojpuri),
            awadhi: keep(self.awadhi),
            maithili: keep(self.maithili),
        }
    }

    /// The full replacement sequence: one entry per submitted language, in
    /// fixed language order, nothing stored for languages left out.
    pub fn into_monologues(self) -> Monologues {
        let links = self.without_blanks();
        let entries = [
            (MonologueLanguage::Haryanvi, links.haryanvi),
            (MonologueLanguage::Rajasthani, links.rajasthani),
            (MonologueLanguage::Bhojpuri, links.bhojpuri),
            (MonologueLanguage::Awadhi, links.awadhi),
            (MonologueLanguage::Maithili, links.maithili),
        ];
        Monologues(
            entries
                .into_iter()
                .filter_map(|(language, url)| url.map(|url| Monologue { language, url }))
                .collect(),
        )
    }
}

/// Personal section as returned by `GET /artist/profile`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub whatsapp: Option<String>,
    pub calling: Option<String>,
    pub short_bio: Option<String>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub home_city: Option<String>,
    pub home_state: Option<String>,
    pub current_city: Option<String>,
    pub current_state: Option<String>,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}

impl From<&Model> for PersonalResponse {
    fn from(m: &Model) -> Self {
        Self {
            id: m.id,
            email: m.email.clone(),
            full_name: m.full_name.clone(),
            whatsapp: m.whatsapp.clone(),
            calling: m.calling.clone(),
            short_bio: m.short_bio.clone(),
            gender: m.gender.clone(),
            language: m.language.clone(),
            home_city: m.home_city.clone(),
            home_state: m.home_state.clone(),
            current_city: m.current_city.clone(),
            current_state: m.current_state.clone(),
            instagram: m.instagram.clone(),
            youtube: m.youtube.clone(),
            twitter: m.twitter.clone(),
            linkedin: m.linkedin.clone(),
        }
    }
}

/// Professional section as returned by `GET /artist/professional`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalResponse {
    pub talent_category: Option<String>,
    pub height: Option<String>,
    pub age: Option<i32>,
    pub screen_age: Option<i32>,
    pub video_reel: Option<String>,
    pub skills: Vec<String>,
    pub past_projects: Vec<PastProject>,
}

impl From<&Model> for ProfessionalResponse {
    fn from(m: &Model) -> Self {
        Self {
            talent_category: m.talent_category.clone(),
            height: m.height.clone(),
            age: m.age,
            screen_age: m.screen_age,
            video_reel: m.video_reel.clone(),
            skills: m.skills.0.clone(),
            past_projects: m.past_projects.0.clone(),
        }
    }
}

/// One entry of the public `GET /artist/artists` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSummary {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub current_city: Option<String>,
    pub current_state: Option<String>,
    pub talent_category: Option<String>,
    pub photos: Photos,
    pub created_at: DateTimeUtc,
}

impl ArtistSummary {
    pub fn from_model(m: &Model, base_url: &str) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name.clone(),
            gender: m.gender.clone(),
            language: m.language.clone(),
            current_city: m.current_city.clone(),
            current_state: m.current_state.clone(),
            talent_category: m.talent_category.clone(),
            photos: m.photos.resolve(base_url),
            created_at: m.created_at,
        }
    }
}

/// A full public profile, `GET /artist/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDetail {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub short_bio: Option<String>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub home_city: Option<String>,
    pub home_state: Option<String>,
    pub current_city: Option<String>,
    pub current_state: Option<String>,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub talent_category: Option<String>,
    pub height: Option<String>,
    pub age: Option<i32>,
    pub screen_age: Option<i32>,
    pub video_reel: Option<String>,
    pub skills: Vec<String>,
    pub past_projects: Vec<PastProject>,
    pub photos: Photos,
    pub monologues: Vec<Monologue>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl ArtistDetail {
    pub fn from_model(m: &Model, base_url: &str) -> Self {
        Self {
            id: m.id,
            email: m.email.clone(),
            full_name: m.full_name.clone(),
            short_bio: m.short_bio.clone(),
            gender: m.gender.clone(),
            language: m.language.clone(),
            home_city: m.home_city.clone(),
            home_state: m.home_state.clone(),
            current_city: m.current_city.clone(),
            current_state: m.current_state.clone(),
            instagram: m.instagram.clone(),
            youtube: m.youtube.clone(),
            twitter: m.twitter.clone(),
            linkedin: m.linkedin.clone(),
            talent_category: m.talent_category.clone(),
            height: m.height.clone(),
            age: m.age,
            screen_age: m.screen_age,
            video_reel: m.video_reel.clone(),
            skills: m.skills.0.clone(),
            past_projects: m.past_projects.0.clone(),
            photos: m.photos.resolve(base_url),
            monologues: m.monologues.0.clone(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
