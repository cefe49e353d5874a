//! Profile setup: personal details, list sections and job preferences.
//!
//! Edits land in the workspace draft field by field and reach the store
//! only through "Save Profile".

use std::fmt::Display;

use axum::{
    Extension, Form, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::HeaderValue,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use super::components::{Tone, badge, empty_state, escape, options, path_segment, progress, tabs};
use super::shell::{Nav, html_shell};
use super::{UiResult, Viewer, with_flash};
use crate::AppState;
use crate::api::accounts::{UPLOAD_BODY_LIMIT, read_upload, resume_response, save_resume};
use crate::api::profile::section;
use crate::domain::analytics::{ActivityKind, ActivityStatus};
use crate::domain::jobs::JobType;
use crate::domain::profile::{
    Degree, Education, Experience, POPULAR_LOCATIONS, POPULAR_ROLES, POPULAR_SKILLS, ProfileSection, Project,
    SKILL_CATEGORIES, Skill, SkillDraft, SkillLevel, add_skill,
};
use crate::domain::resume::{MAX_RESUME_BYTES, ResumeInfo};
use crate::editor::submit;
use crate::error::ApiError;
use crate::workspace::{ProfileDraft, Workspace};

const PANEL: &str = "profile-panel";

const TABS: [(&str, &str); 6] = [
    ("personal", "Personal Info"),
    ("education", "Education"),
    ("experience", "Experience"),
    ("skills", "Skills"),
    ("projects", "Projects"),
    ("preferences", "Job Preferences"),
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(page))
        .route("/ui/profile/tab/{tab}", get(tab_fragment))
        .route("/ui/profile/personal/{field}", post(set_personal))
        .route("/ui/profile/records/{section}", post(add_record))
        .route("/ui/profile/records/{section}/{id}", delete(remove_record))
        .route("/ui/profile/records/{section}/{id}/{field}", post(update_record))
        .route("/ui/profile/skills", post(add_skill_form))
        .route("/ui/profile/prefs/{field}", post(set_preference))
        .route("/ui/profile/job-types/{job_type}", post(toggle_job_type))
        .route("/ui/profile/suggest/{list}", post(add_suggestion))
        .route("/ui/profile/save", post(save))
        .route("/ui/profile/reset", post(reset))
        .route(
            "/ui/profile/resume",
            post(upload_resume)
                .get(download_resume)
                .delete(remove_resume)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}

#[derive(Debug, Deserialize)]
pub struct FieldValue {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
pub struct TabQuery {
    tab: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

/// `hx-vals` payload carrying a single `value`.
fn vals(value: &str) -> String {
    escape(&serde_json::json!({ "value": value }).to_string())
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn input(label: &str, url: &str, value: &str, kind: &str) -> String {
    format!(
        r#"<label class="field"><span>{label}</span><input type="{kind}" name="value" value="{value}" hx-post="{url}" hx-trigger="change" hx-swap="none"></label>"#,
        value = escape(value),
    )
}

fn textarea(label: &str, url: &str, value: &str) -> String {
    format!(
        r#"<label class="field wide"><span>{label}</span><textarea name="value" rows="3" hx-post="{url}" hx-trigger="change" hx-swap="none">{}</textarea></label>"#,
        escape(value)
    )
}

fn select(label: &str, url: &str, choices: &str) -> String {
    format!(
        r#"<label class="field"><span>{label}</span><select name="value" hx-post="{url}" hx-trigger="change" hx-swap="none">{choices}</select></label>"#
    )
}

/// Checkbox that posts its next value and re-renders the panel.
fn checkbox(label: &str, url: &str, checked: bool) -> String {
    let mark = if checked { " checked" } else { "" };
    format!(
        r##"<label class="check"><input type="checkbox"{mark} hx-post="{url}" hx-vals="{vals}" hx-target="#{PANEL}"> {label}</label>"##,
        vals = vals(if checked { "false" } else { "true" }),
    )
}

fn record_card(section: ProfileSection, id: &str, title: &str, fields: &str) -> String {
    format!(
        r##"<article class="card record">
    <header class="record-head">
        <h3>{title}</h3>
        <button class="btn btn-ghost tone-red" hx-delete="/ui/profile/records/{section}/{id}" hx-target="#{PANEL}">Remove</button>
    </header>
    <div class="grid-2">{fields}</div>
</article>"##,
        title = escape(title),
        id = path_segment(id),
    )
}

fn record_url(section: ProfileSection, id: &str, field: &str) -> String {
    format!("/ui/profile/records/{section}/{}/{field}", path_segment(id))
}

fn add_button(section: ProfileSection, label: &str) -> String {
    format!(
        r##"<button class="btn btn-secondary" hx-post="/ui/profile/records/{section}" hx-target="#{PANEL}">+ Add {label}</button>"##
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Panels
// ─────────────────────────────────────────────────────────────────────────────

fn personal_panel(viewer: &Viewer, draft: &ProfileDraft) -> String {
    let account = &viewer.account;
    let p = &draft.personal;
    let url = |field: &str| format!("/ui/profile/personal/{field}");
    format!(
        r#"<section class="card">
    <h2>Personal Information</h2>
    <p class="muted">{name} · {email}</p>
    <div class="grid-2">
        {phone}{location}{linkedin}{github}{portfolio}
    </div>
</section>"#,
        name = escape(&account.display_name()),
        email = escape(&account.email),
        phone = input("Phone", &url("phone"), &p.phone, "tel"),
        location = input("Location", &url("location"), &p.location, "text"),
        linkedin = input("LinkedIn URL", &url("linkedin_url"), &p.linkedin_url, "url"),
        github = input("GitHub URL", &url("github_url"), &p.github_url, "url"),
        portfolio = input("Portfolio URL", &url("portfolio_url"), &p.portfolio_url, "url"),
    )
}

fn resume_card(info: Option<&ResumeInfo>) -> String {
    let status = match info {
        Some(info) => format!(
            r##"<p><strong>{name}</strong> <span class="muted">· {size} KB · uploaded {date}</span></p>
    <div class="actions">
        <a class="btn btn-secondary" href="/ui/profile/resume" download>Download</a>
        <button class="btn btn-ghost tone-red" hx-delete="/ui/profile/resume" hx-target="#resume-card" hx-swap="outerHTML" hx-confirm="Remove your resume?">Remove</button>
    </div>"##,
            name = escape(&info.filename),
            size = info.size_bytes.div_ceil(1024),
            date = info.uploaded_at.format("%b %d, %Y"),
        ),
        None => empty_state("No resume uploaded yet."),
    };
    format!(
        r##"<section class="card" id="resume-card">
    <h2>Resume</h2>
    {status}
    <form class="stack" hx-post="/ui/profile/resume" hx-encoding="multipart/form-data" hx-target="#resume-card" hx-swap="outerHTML">
        <input type="file" name="resume" accept=".pdf,.doc,.docx" required>
        <p class="muted">PDF or Word, up to {limit}MB.</p>
        <button type="submit" class="btn btn-secondary">Upload Resume</button>
    </form>
</section>"##,
        limit = MAX_RESUME_BYTES / (1024 * 1024),
    )
}

fn education_card(edu: &Education) -> String {
    let s = ProfileSection::Education;
    let url = |field: &str| record_url(s, &edu.id, field);
    let degrees = options(
        Degree::ALL.iter().map(|d| (d.as_str(), d.label())),
        edu.degree.as_str(),
    );
    let fields = [
        input("Institution", &url("institution"), &edu.institution, "text"),
        select("Degree", &url("degree"), &degrees),
        input("Field of study", &url("field_of_study"), &edu.field_of_study, "text"),
        input("Start year", &url("start_year"), &opt(edu.start_year), "number"),
        input("End year", &url("end_year"), &opt(edu.end_year), "number"),
        input("CGPA", &url("cgpa"), &opt(edu.cgpa), "number"),
        input("Percentage", &url("percentage"), &opt(edu.percentage), "number"),
    ]
    .concat();
    let title = if edu.institution.is_empty() { "New education" } else { &edu.institution };
    record_card(s, &edu.id, title, &fields)
}

fn experience_card(exp: &Experience) -> String {
    let s = ProfileSection::Experience;
    let url = |field: &str| record_url(s, &exp.id, field);
    let end = if exp.is_current {
        String::new()
    } else {
        input("End date", &url("end_date"), &date(exp.end_date), "date")
    };
    let fields = [
        input("Company", &url("company"), &exp.company, "text"),
        input("Position", &url("position"), &exp.position, "text"),
        input("Location", &url("location"), &exp.location, "text"),
        input("Start date", &url("start_date"), &date(exp.start_date), "date"),
        end,
        checkbox("I currently work here", &url("is_current"), exp.is_current),
        textarea("Description", &url("description"), &exp.description),
    ]
    .concat();
    let title = if exp.position.is_empty() { "New experience" } else { &exp.position };
    record_card(s, &exp.id, title, &fields)
}

fn project_card(project: &Project) -> String {
    let s = ProfileSection::Projects;
    let url = |field: &str| record_url(s, &project.id, field);
    let end = if project.is_ongoing {
        String::new()
    } else {
        input("End date", &url("end_date"), &date(project.end_date), "date")
    };
    let techs: String = project
        .technologies_list()
        .iter()
        .map(|t| badge(t, Tone::Blue))
        .collect();
    let fields = [
        input("Title", &url("title"), &project.title, "text"),
        input("Technologies", &url("technologies"), &project.technologies, "text"),
        input("GitHub URL", &url("github_url"), &project.github_url, "url"),
        input("Live URL", &url("live_url"), &project.live_url, "url"),
        input("Start date", &url("start_date"), &date(project.start_date), "date"),
        end,
        checkbox("Ongoing project", &url("is_ongoing"), project.is_ongoing),
        textarea("Description", &url("description"), &project.description),
        format!(r#"<div class="badges wide">{techs}</div>"#),
    ]
    .concat();
    let title = if project.title.is_empty() { "New project" } else { &project.title };
    record_card(s, &project.id, title, &fields)
}

fn skill_card(skill: &Skill) -> String {
    let s = ProfileSection::Skills;
    let url = |field: &str| record_url(s, &skill.id, field);
    let levels: Vec<(&str, String)> = SkillLevel::ALL.iter().map(|l| (l.as_str(), l.to_string())).collect();
    let levels = options(levels.iter().map(|(v, l)| (*v, l.as_str())), skill.level.as_str());
    let categories = options(SKILL_CATEGORIES.iter().map(|c| (*c, *c)), &skill.category);
    let fields = [
        select("Level", &url("level"), &levels),
        select("Category", &url("category"), &categories),
    ]
    .concat();
    record_card(s, &skill.id, &skill.name, &fields)
}

fn list_panel<T>(
    heading: &str,
    section: ProfileSection,
    label: &str,
    records: impl ExactSizeIterator<Item = T>,
    render: impl Fn(T) -> String,
) -> String {
    let body = if records.len() == 0 {
        empty_state(&format!("No {label} added yet."))
    } else {
        records.map(render).collect()
    };
    format!(
        r#"<section class="stack">
    <div class="section-head"><h2>{heading}</h2>{add}</div>
    {body}
</section>"#,
        add = add_button(section, label),
    )
}

fn skills_panel(draft: &ProfileDraft) -> String {
    let listed = |name: &str| draft.skills.iter().any(|s| s.name.eq_ignore_ascii_case(name));
    let popular: String = POPULAR_SKILLS
        .iter()
        .filter(|name| !listed(name))
        .map(|name| {
            format!(
                r##"<button class="chip" hx-post="/ui/profile/skills" hx-vals="{vals}" hx-target="#{PANEL}">+ {label}</button>"##,
                vals = escape(&serde_json::json!({ "name": name }).to_string()),
                label = escape(name),
            )
        })
        .collect();
    let levels: Vec<(&str, String)> = SkillLevel::ALL.iter().map(|l| (l.as_str(), l.to_string())).collect();
    let level_options = options(
        levels.iter().map(|(v, l)| (*v, l.as_str())),
        SkillLevel::Intermediate.as_str(),
    );
    let category_options = options(SKILL_CATEGORIES.iter().map(|c| (*c, *c)), SKILL_CATEGORIES[0]);
    let listed_html = if draft.skills.is_empty() {
        empty_state("No skills added yet.")
    } else {
        draft.skills.iter().map(skill_card).collect()
    };
    format!(
        r##"<section class="stack">
    <h2>Skills</h2>
    <form class="card grid-4" hx-post="/ui/profile/skills" hx-target="#{PANEL}">
        <label class="field"><span>Skill</span><input type="text" name="name" placeholder="e.g. Rust" required></label>
        <label class="field"><span>Level</span><select name="level">{level_options}</select></label>
        <label class="field"><span>Category</span><select name="category">{category_options}</select></label>
        <button type="submit" class="btn btn-primary">Add Skill</button>
    </form>
    <div class="chips"><span class="muted">Popular:</span> {popular}</div>
    {listed_html}
</section>"##
    )
}

fn suggestions(list: &str, items: &[&str], current: &str) -> String {
    let present = crate::domain::split_list(current);
    items
        .iter()
        .filter(|item| !present.iter().any(|p| p == *item))
        .map(|item| {
            format!(
                r##"<button class="chip" hx-post="/ui/profile/suggest/{list}" hx-vals="{vals}" hx-target="#{PANEL}">+ {label}</button>"##,
                vals = vals(item),
                label = escape(item),
            )
        })
        .collect()
}

fn preferences_panel(draft: &ProfileDraft) -> String {
    let prefs = &draft.preferences;
    let url = |field: &str| format!("/ui/profile/prefs/{field}");
    let job_types: String = JobType::ALL
        .iter()
        .map(|t| {
            let mark = if prefs.job_types.contains(t) { " checked" } else { "" };
            format!(
                r##"<label class="check"><input type="checkbox"{mark} hx-post="/ui/profile/job-types/{t}" hx-target="#{PANEL}"> {label}</label>"##,
                label = t.label(),
            )
        })
        .collect();
    format!(
        r#"<section class="card stack">
    <h2>Job Preferences</h2>
    {roles}
    <div class="chips">{role_chips}</div>
    {locations}
    <div class="chips">{location_chips}</div>
    <fieldset><legend>Job types</legend>{job_types}</fieldset>
    <div class="grid-2">{min}{max}</div>
    {remote}
    {relocate}
</section>"#,
        roles = input("Preferred roles", &url("preferred_roles"), &prefs.preferred_roles, "text"),
        role_chips = suggestions("roles", &POPULAR_ROLES, &prefs.preferred_roles),
        locations = input(
            "Preferred locations",
            &url("preferred_locations"),
            &prefs.preferred_locations,
            "text"
        ),
        location_chips = suggestions("locations", &POPULAR_LOCATIONS, &prefs.preferred_locations),
        min = input("Minimum salary (₹/year)", &url("min_salary"), &opt(prefs.min_salary), "number"),
        max = input("Maximum salary (₹/year)", &url("max_salary"), &opt(prefs.max_salary), "number"),
        remote = checkbox("Open to remote work", &url("remote_work"), prefs.remote_work),
        relocate = checkbox("Willing to relocate", &url("willing_to_relocate"), prefs.willing_to_relocate),
    )
}

/// Tab strip plus the active tab's body; the content of `#profile-panel`.
fn panel(tab: &str, viewer: &Viewer, draft: &ProfileDraft) -> UiResult<String> {
    let body = match tab {
        "personal" => personal_panel(viewer, draft),
        "preferences" => preferences_panel(draft),
        name => match section(name)? {
            ProfileSection::Education => list_panel(
                "Education",
                ProfileSection::Education,
                "education",
                draft.education.iter(),
                education_card,
            ),
            ProfileSection::Experience => list_panel(
                "Work Experience",
                ProfileSection::Experience,
                "experience",
                draft.experience.iter(),
                experience_card,
            ),
            ProfileSection::Projects => list_panel(
                "Projects",
                ProfileSection::Projects,
                "project",
                draft.projects.iter(),
                project_card,
            ),
            ProfileSection::Skills => skills_panel(draft),
        },
    };
    Ok(format!("{}{body}", tabs("/ui/profile/tab", PANEL, &TABS, tab)))
}

fn render(state: &AppState, viewer: &Viewer, workspace: &Workspace, tab: &str) -> UiResult {
    let html = workspace.with_profile(&state.store, viewer.id(), |draft| panel(tab, viewer, draft))?;
    Ok(Html(html))
}

fn tab_of(section: ProfileSection) -> &'static str {
    section.as_str()
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /profile?tab=
async fn page(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    Query(query): Query<TabQuery>,
) -> UiResult {
    let tab = query.tab.as_deref().unwrap_or("personal");
    let Html(current) = render(&state, &viewer, &workspace, tab)?;
    let completion = workspace.with_profile(&state.store, viewer.id(), |draft| draft.to_profile().completion());

    let content = format!(
        r##"<section class="page-head">
    <h1>Profile Setup</h1>
    <p class="muted">Complete your profile so every application goes out with the right details.</p>
    {bar}
</section>
<div id="{PANEL}">{current}</div>
{resume}
<div class="actions">
    <button class="btn btn-ghost" hx-post="/ui/profile/reset" hx-confirm="Discard unsaved changes?">Discard changes</button>
    <button class="btn btn-primary" hx-post="/ui/profile/save" hx-swap="none">Save Profile</button>
</div>"##,
        bar = progress(u32::from(completion)),
        resume = resume_card(state.store.resume_info(viewer.id()).as_ref()),
    );
    Ok(Html(html_shell("Profile", Nav::Profile, &viewer, &content)))
}

/// GET /ui/profile/tab/{tab}
async fn tab_fragment(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    Path(tab): Path<String>,
) -> UiResult {
    render(&state, &viewer, &workspace, &tab)
}

/// POST /ui/profile/personal/{field}
async fn set_personal(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    Path(field): Path<String>,
    Form(form): Form<FieldValue>,
) -> UiResult {
    workspace.with_profile(&state.store, viewer.id(), |draft| draft.personal.set_field(&field, &form.value))?;
    Ok(Html(String::new()))
}

/// POST /ui/profile/records/{section} - Append a blank record.
async fn add_record(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    Path(name): Path<String>,
) -> UiResult {
    let section = section(&name)?;
    workspace.with_profile(&state.store, viewer.id(), |draft| draft.add(section));
    render(&state, &viewer, &workspace, tab_of(section))
}

/// POST /ui/profile/records/{section}/{id}/{field}
async fn update_record(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    Path((name, id, field)): Path<(String, String, String)>,
    Form(form): Form<FieldValue>,
) -> UiResult {
    let section = section(&name)?;
    workspace.with_profile(&state.store, viewer.id(), |draft| {
        draft.update(section, &id, &field, &form.value)
    })?;
    render(&state, &viewer, &workspace, tab_of(section))
}

/// DELETE /ui/profile/records/{section}/{id}
async fn remove_record(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    Path((name, id)): Path<(String, String)>,
) -> UiResult {
    let section = section(&name)?;
    if !workspace.with_profile(&state.store, viewer.id(), |draft| draft.remove(section, &id)) {
        return Err(ApiError::NotFound(format!("no record with id `{id}`")).into());
    }
    render(&state, &viewer, &workspace, tab_of(section))
}

/// POST /ui/profile/skills - Add a skill unless it is already listed.
async fn add_skill_form(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    Form(form): Form<SkillDraft>,
) -> UiResult {
    let added = workspace.with_profile(&state.store, viewer.id(), |draft| add_skill(&mut draft.skills, &form))?;
    let Html(html) = render(&state, &viewer, &workspace, "skills")?;
    Ok(match added {
        Some(_) => Html(html),
        None => with_flash(html, &format!("{} is already in your skills", form.name.trim())),
    })
}

/// POST /ui/profile/prefs/{field}
async fn set_preference(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    Path(field): Path<String>,
    Form(form): Form<FieldValue>,
) -> UiResult {
    workspace.with_profile(&state.store, viewer.id(), |draft| {
        draft.preferences.set_field(&field, &form.value)
    })?;
    render(&state, &viewer, &workspace, "preferences")
}

/// POST /ui/profile/job-types/{job_type}
async fn toggle_job_type(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    Path(job_type): Path<String>,
) -> UiResult {
    let job_type: JobType = job_type.parse().map_err(ApiError::BadRequest)?;
    workspace.with_profile(&state.store, viewer.id(), |draft| draft.preferences.toggle_job_type(job_type));
    render(&state, &viewer, &workspace, "preferences")
}

/// POST /ui/profile/suggest/{roles|locations}
async fn add_suggestion(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
    Path(list): Path<String>,
    Form(form): Form<FieldValue>,
) -> UiResult {
    workspace.with_profile(&state.store, viewer.id(), |draft| match list.as_str() {
        "roles" => Ok(draft.preferences.add_role(&form.value)),
        "locations" => Ok(draft.preferences.add_location(&form.value)),
        other => Err(ApiError::NotFound(format!("unknown suggestion list `{other}`"))),
    })?;
    render(&state, &viewer, &workspace, "preferences")
}

/// POST /ui/profile/save - Validate the draft and store it.
async fn save(
    State(state): State<AppState>,
    viewer: Viewer,
    Extension(workspace): Extension<Workspace>,
) -> UiResult {
    viewer.require_sign_in("save your profile")?;
    let profile = workspace.with_profile(&state.store, viewer.id(), |draft| draft.to_profile());
    submit(&profile, |_| ())?;
    ApiError::check(profile.validate())?;
    state.store.save_profile(viewer.id(), profile)?;
    state.store.log_activity(
        viewer.id(),
        ActivityKind::Profile,
        "Updated profile".into(),
        ActivityStatus::Success,
    );
    info!(name: "profile.saved", account_id = viewer.id(), "Profile saved");
    Ok(with_flash(String::new(), "Profile saved successfully!"))
}

/// POST /ui/profile/resume - Store the uploaded file right away.
async fn upload_resume(State(state): State<AppState>, viewer: Viewer, mut multipart: Multipart) -> UiResult {
    viewer.require_sign_in("upload a resume")?;
    let upload = read_upload(&mut multipart, "resume").await?;
    let info = save_resume(&state, viewer.id(), upload)?;
    Ok(with_flash(resume_card(Some(&info)), "Resume uploaded"))
}

/// GET /ui/profile/resume
async fn download_resume(State(state): State<AppState>, viewer: Viewer) -> UiResult<Response> {
    let resume = state
        .store
        .resume(viewer.id())
        .ok_or_else(|| ApiError::NotFound("no resume uploaded".into()))?;
    Ok(resume_response(resume)?)
}

/// DELETE /ui/profile/resume
async fn remove_resume(State(state): State<AppState>, viewer: Viewer) -> UiResult {
    viewer.require_sign_in("remove your resume")?;
    state.store.remove_resume(viewer.id())?;
    Ok(Html(resume_card(None)))
}

/// POST /ui/profile/reset - Drop unsaved edits and reload the page.
async fn reset(Extension(workspace): Extension<Workspace>) -> Response {
    workspace.reset_profile();
    let mut response = Html(String::new()).into_response();
    response
        .headers_mut()
        .insert("HX-Refresh", HeaderValue::from_static("true"));
    response
}
