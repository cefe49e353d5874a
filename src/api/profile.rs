//! Record-level editing of the profile list sections.
//!
//! Each call loads the stored profile into a [`ProfileDraft`], applies one
//! list-editor operation and saves the result. A failed field write leaves
//! the stored profile untouched.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;

use crate::AppState;
use crate::domain::profile::{Profile, ProfileSection, SkillDraft, add_skill};
use crate::error::{ApiError, ApiResult};
use crate::security::UserContext;
use crate::workspace::ProfileDraft;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile/{section}/", get(api_list).post(api_add))
        .route("/profile/{section}/{id}/", axum::routing::patch(api_update).delete(api_remove))
}

/// Body of `PATCH profile/{section}/{id}/`.
#[derive(Debug, Deserialize)]
struct FieldUpdate {
    field: String,
    value: String,
}

pub(crate) fn section(name: &str) -> ApiResult<ProfileSection> {
    name.parse()
        .map_err(|()| ApiError::NotFound(format!("unknown profile section `{name}`")))
}

fn load(state: &AppState, account_id: u64) -> ApiResult<ProfileDraft> {
    let profile = state
        .store
        .profile(account_id)
        .ok_or_else(|| ApiError::NotFound("profile not found".into()))?;
    Ok(ProfileDraft::from_profile(account_id, &profile))
}

fn save(state: &AppState, draft: &ProfileDraft) -> ApiResult<Profile> {
    let profile = draft.to_profile();
    ApiError::check(profile.validate())?;
    Ok(state.store.save_profile(draft.account_id, profile)?)
}

fn section_json(profile: &Profile, section: ProfileSection) -> serde_json::Result<Value> {
    match section {
        ProfileSection::Education => serde_json::to_value(&profile.education),
        ProfileSection::Experience => serde_json::to_value(&profile.experience),
        ProfileSection::Projects => serde_json::to_value(&profile.projects),
        ProfileSection::Skills => serde_json::to_value(&profile.skills),
    }
}

fn record_json(profile: &Profile, section: ProfileSection, id: &str) -> ApiResult<Value> {
    section_json(profile, section)
        .map_err(anyhow::Error::from)?
        .as_array()
        .and_then(|records| records.iter().find(|r| r["id"] == id).cloned())
        .ok_or_else(|| ApiError::NotFound(format!("no record with id `{id}`")))
}

/// GET /api/profile/{section}/
async fn api_list(State(state): State<AppState>, user: UserContext, Path(name): Path<String>) -> ApiResult<Json<Value>> {
    let section = section(&name)?;
    let profile = state.store.profile(user.account_id).unwrap_or_default();
    Ok(Json(section_json(&profile, section).map_err(anyhow::Error::from)?))
}

/// POST /api/profile/{section}/ - Append a record built from field values.
///
/// Skills are matched by name; adding a listed skill returns the existing one.
async fn api_add(
    State(state): State<AppState>,
    user: UserContext,
    Path(name): Path<String>,
    Json(fields): Json<BTreeMap<String, String>>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let section = section(&name)?;
    let mut draft = load(&state, user.account_id)?;

    let (id, created) = if section == ProfileSection::Skills {
        let mut skill = SkillDraft::default();
        for (field, value) in &fields {
            match field.as_str() {
                "name" => skill.name.clone_from(value),
                "level" => {
                    skill.level = value.parse().map_err(|()| {
                        ApiError::from(crate::editor::FieldError::invalid("level", "unknown skill level"))
                    })?;
                }
                "category" => skill.category.clone_from(value),
                other => return Err(crate::editor::FieldError::UnknownField(other.to_string()).into()),
            }
        }
        match add_skill(&mut draft.skills, &skill)? {
            Some(id) => (id, true),
            None => {
                let existing = draft
                    .skills
                    .iter()
                    .find(|s| s.name.eq_ignore_ascii_case(skill.name.trim()))
                    .map(|s| s.id.clone())
                    .unwrap_or_default();
                (existing, false)
            }
        }
    } else {
        let id = draft.add(section);
        for (field, value) in &fields {
            draft.update(section, &id, field, value)?;
        }
        (id, true)
    };

    let profile = if created { save(&state, &draft)? } else { draft.to_profile() };
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(record_json(&profile, section, &id)?)))
}

/// PATCH /api/profile/{section}/{id}/ - Write one field of one record.
async fn api_update(
    State(state): State<AppState>,
    user: UserContext,
    Path((name, id)): Path<(String, String)>,
    Json(update): Json<FieldUpdate>,
) -> ApiResult<Json<Value>> {
    let section = section(&name)?;
    let mut draft = load(&state, user.account_id)?;
    draft.update(section, &id, &update.field, &update.value)?;
    let profile = save(&state, &draft)?;
    Ok(Json(record_json(&profile, section, &id)?))
}

/// DELETE /api/profile/{section}/{id}/
async fn api_remove(
    State(state): State<AppState>,
    user: UserContext,
    Path((name, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let section = section(&name)?;
    let mut draft = load(&state, user.account_id)?;
    if !draft.remove(section, &id) {
        return Err(ApiError::NotFound(format!("no record with id `{id}`")));
    }
    save(&state, &draft)?;
    Ok(StatusCode::NO_CONTENT)
}
