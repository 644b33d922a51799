use super::*;

use crewhands_protocols::page::fake::FakePage;

use crate::testing::{job, profile};

const YOTSPOT_URL: &str = "https://www.yotspot.com/job/1/apply";
const YACREW_URL: &str = "https://www.yacrew.com/apply/5";
const GENERIC_URL: &str = "https://careers.example.com/apply/77";

const YOTSPOT_FORM: &str = r#"<html><body><form>
    <input name="first_name"><input name="last_name">
    <input type="email" name="email"><input name="phone">
    <select name="nationality"><option>Portuguese</option></select>
    <textarea name="message"></textarea>
    <textarea name="experience"></textarea>
    <input type="file" name="cv_upload">
    <input type="file" name="certificate_file">
    <button type="submit">Apply</button>
</form></body></html>"#;

fn filler() -> FormAutoFiller {
    FormAutoFiller::new(Arc::new(profile())).with_submit_wait(Duration::ZERO)
}

#[tokio::test]
async fn test_yotspot_form_filled_and_submitted() {
    let page = FakePage::new().route(YOTSPOT_URL, YOTSPOT_FORM);

    let result = filler()
        .apply(&page, &job("y1", "Chief Stewardess", Some(YOTSPOT_URL)), None)
        .await;

    assert_eq!(result.outcome, SubmitOutcome::LikelySubmitted);
    assert_eq!(result.message, "Form likely submitted");
    assert_eq!(result.job_id, "y1");
    assert_eq!(result.url.as_deref(), Some(YOTSPOT_URL));

    assert_eq!(page.value_of(r#"input[name="first_name"]"#).as_deref(), Some("Ana"));
    assert_eq!(page.value_of(r#"input[name="last_name"]"#).as_deref(), Some("Silva"));
    assert_eq!(page.value_of(r#"input[name="email"]"#).as_deref(), Some("ana@example.com"));
    assert_eq!(page.value_of("select").as_deref(), Some("Portuguese"));
    assert!(page
        .value_of(r#"textarea[name="message"]"#)
        .unwrap()
        .starts_with("Dear Hiring Manager,"));
    assert!(page
        .value_of(r#"textarea[name="experience"]"#)
        .unwrap()
        .starts_with("Current Position: Second Stewardess"));

    let uploads: Vec<String> = page
        .uploads()
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    assert_eq!(uploads, vec!["/profiles/ana/cv.pdf", "/profiles/ana/stcw.pdf"]);
    assert_eq!(page.submit_count(), 1);
}

#[tokio::test]
async fn test_custom_message_replaces_letter() {
    let page = FakePage::new().route(YOTSPOT_URL, YOTSPOT_FORM);

    filler()
        .apply(
            &page,
            &job("y1", "Deckhand", Some(YOTSPOT_URL)),
            Some("  Keen to join your crew. "),
        )
        .await;

    assert_eq!(
        page.value_of(r#"textarea[name="message"]"#).as_deref(),
        Some("Keen to join your crew.")
    );
}

#[tokio::test]
async fn test_success_indicator_and_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::new()
        .route(YOTSPOT_URL, YOTSPOT_FORM)
        .on_submit(YOTSPOT_URL, r#"<div class="success-message">Thanks!</div>"#);

    let result = filler()
        .with_snapshots(SnapshotStore::new(dir.path()))
        .apply(&page, &job("y1", "Chef", Some(YOTSPOT_URL)), None)
        .await;

    assert_eq!(result.outcome, SubmitOutcome::Submitted);
    assert_eq!(page.snapshot_count(), 1);
    let shots: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(shots.len(), 1);
}

#[tokio::test]
async fn test_error_indicator_after_submit() {
    let page = FakePage::new()
        .route(YOTSPOT_URL, YOTSPOT_FORM)
        .on_submit(YOTSPOT_URL, r#"<p class="error-message">CV is required</p>"#);

    let result = filler()
        .apply(&page, &job("y1", "Chef", Some(YOTSPOT_URL)), None)
        .await;

    assert_eq!(result.outcome, SubmitOutcome::Failed);
    assert_eq!(result.message, "CV is required");
    assert!(!result.is_success());
}

#[tokio::test]
async fn test_generic_cascade() {
    let html = r#"<form>
        <label for="a1">First name</label><input id="a1" name="q1">
        <label for="a2">Surname *</label><input id="a2" name="q2">
        <input type="text" name="contact_email_address">
        <input type="text" placeholder="Mobile number" name="q4">
        <label for="msg">Your message</label><textarea id="msg" name="q5"></textarea>
        <input type="text" name="nationality">
        <input type="file" name="documents">
        <button type="submit">Send</button>
    </form>"#;
    let page = FakePage::new().route(GENERIC_URL, html);

    let result = filler()
        .apply(&page, &job("g1", "Bosun", Some(GENERIC_URL)), Some("Hello"))
        .await;

    assert_eq!(result.outcome, SubmitOutcome::LikelySubmitted);
    assert_eq!(page.value_of("#a1").as_deref(), Some("Ana"));
    assert_eq!(page.value_of("#a2").as_deref(), Some("Silva"));
    assert_eq!(
        page.value_of(r#"input[name="contact_email_address"]"#).as_deref(),
        Some("ana@example.com")
    );
    assert_eq!(page.value_of(r#"input[name="q4"]"#).as_deref(), Some("+33 6 12 34 56 78"));
    assert_eq!(page.value_of("#msg").as_deref(), Some("Hello"));
    assert_eq!(page.value_of(r#"input[name="nationality"]"#).as_deref(), Some("Portuguese"));
    assert_eq!(page.uploads().len(), 1);
}

#[tokio::test]
async fn test_label_beats_name_attribute() {
    let html = r#"<form>
        <input type="text" name="email_confirmation">
        <label for="e1">E-mail address</label><input id="e1" name="x1">
        <button type="submit">Send</button>
    </form>"#;
    let page = FakePage::new().route(GENERIC_URL, html);

    filler()
        .apply(&page, &job("g2", "Chef", Some(GENERIC_URL)), None)
        .await;

    assert_eq!(page.value_of("#e1").as_deref(), Some("ana@example.com"));
    assert_eq!(page.value_of(r#"input[name="email_confirmation"]"#), None);
}

#[tokio::test]
async fn test_checkboxes_are_never_unchecked() {
    let html = r#"<form>
        <input name="firstName"><input name="lastName">
        <input name="currentPosition">
        <select name="yearsExperience"><option>5</option></select>
        <textarea name="coverLetter"></textarea>
        <input type="checkbox" name="certifications[]" value="STCW" checked>
        <input type="checkbox" name="certifications[]" value="ENG1">
        <input type="checkbox" name="certifications[]" value="Yachtmaster">
        <label for="lang-en">English</label><input type="checkbox" id="lang-en" name="lang_1">
        <input type="checkbox" name="languages" value="French (fluent)">
        <input type="file" accept=".pdf,.doc" name="resume">
        <button type="submit" class="submit-application">Send</button>
    </form>"#;
    let page = FakePage::new().route(YACREW_URL, html);

    let result = filler()
        .apply(&page, &job("c1", "Stewardess", Some(YACREW_URL)), None)
        .await;

    assert!(result.is_success());
    assert_eq!(page.checked_state(r#"input[value="STCW"]"#), Some(true));
    assert_eq!(page.checked_state(r#"input[value="ENG1"]"#), Some(true));
    assert_eq!(page.checked_state(r#"input[value="Yachtmaster"]"#), Some(false));
    assert_eq!(page.checked_state("#lang-en"), Some(true));
    assert_eq!(page.checked_state(r#"input[name="languages"]"#), Some(true));

    assert_eq!(page.value_of(r#"input[name="currentPosition"]"#).as_deref(), Some("Second Stewardess"));
    assert_eq!(page.value_of("select").as_deref(), Some("5"));
    assert_eq!(page.uploads().len(), 1);
}

#[tokio::test]
async fn test_missing_submit_control() {
    let page = FakePage::new().route(GENERIC_URL, r#"<form><input name="email"></form>"#);

    let result = filler()
        .apply(&page, &job("g3", "Chef", Some(GENERIC_URL)), None)
        .await;

    assert_eq!(result.outcome, SubmitOutcome::Failed);
    assert_eq!(result.message, "Submit button not found");
    assert_eq!(page.submit_count(), 0);
}

#[tokio::test]
async fn test_missing_url_fails_without_navigation() {
    let page = FakePage::new();

    let result = filler().apply(&page, &job("n1", "Chef", None), None).await;

    assert_eq!(result.outcome, SubmitOutcome::Failed);
    assert!(result.message.contains("no application URL"));
    assert!(page.visited().is_empty());
}

#[tokio::test]
async fn test_navigation_failure_takes_diagnostic_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::new().fail_route("https://www.yotspot.com");

    let result = filler()
        .with_snapshots(SnapshotStore::new(dir.path()))
        .apply(&page, &job("y2", "Chef", Some(YOTSPOT_URL)), None)
        .await;

    assert_eq!(result.outcome, SubmitOutcome::Failed);
    assert!(result.message.starts_with("Navigation failed"));
    assert_eq!(page.snapshot_count(), 1);
}

#[tokio::test]
async fn test_upload_failure_is_skipped() {
    let html = YOTSPOT_FORM.replace(
        r#"name="cv_upload""#,
        r#"name="cv_upload" data-fake-upload="fail""#,
    );
    let page = FakePage::new().route(YOTSPOT_URL, html);

    let result = filler()
        .apply(&page, &job("y3", "Chef", Some(YOTSPOT_URL)), None)
        .await;

    assert!(result.is_success());
    let uploads: Vec<String> = page
        .uploads()
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    assert_eq!(uploads, vec!["/profiles/ana/stcw.pdf"]);
}
