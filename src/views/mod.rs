//! Server-rendered HTML pages.
//!
//! Every user-supplied value goes through [`text`] or [`attr`] before it is
//! written into markup.

use escaper::{encode_attribute, encode_minimal};
use url::Url;

use crate::models::herb::HerbBatchSubmission;
use crate::services::transfer::ReportView;
use crate::services::validation::ValidationErrors;

const STYLES: &str = include_str!("../../static/styles.css");
const SCAN_PAGE: &str = include_str!("../../static/scan.html");

fn text(value: &str) -> String {
    encode_minimal(value)
}

fn attr(value: &str) -> String {
    encode_attribute(value)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Herblore Chain</title>
<style>{STYLES}</style>
</head>
<body>
<header class="site-header"><a href="/">Herblore Chain</a><nav><a href="/">New record</a><a href="/scan">Scan &amp; identify</a></nav></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = text(title),
    )
}

struct FormField {
    name: &'static str,
    label: &'static str,
    placeholder: &'static str,
    kind: FieldKind,
}

enum FieldKind {
    Input(&'static str),
    TextArea,
}

const TEXT_FIELDS: &[FormField] = &[
    FormField {
        name: "herbName",
        label: "Herb Name",
        placeholder: "e.g., Ashwagandha",
        kind: FieldKind::Input("text"),
    },
    FormField {
        name: "batchId",
        label: "Batch ID",
        placeholder: "Unique identifier for the batch",
        kind: FieldKind::Input("text"),
    },
    FormField {
        name: "sourceLocation",
        label: "Source Location (GPS)",
        placeholder: "e.g., 18.5204, 73.8567",
        kind: FieldKind::Input("text"),
    },
    FormField {
        name: "collectionTimestamp",
        label: "Collection Timestamp",
        placeholder: "",
        kind: FieldKind::Input("datetime-local"),
    },
];

const DETAIL_FIELDS: &[FormField] = &[
    FormField {
        name: "processingDetails",
        label: "Processing Details",
        placeholder: "Describe the initial processing steps (drying, cleaning, etc.)",
        kind: FieldKind::TextArea,
    },
    FormField {
        name: "supplierDetails",
        label: "Supplier Details",
        placeholder: "Information about the supplier or distributor",
        kind: FieldKind::TextArea,
    },
    FormField {
        name: "manufacturerDetails",
        label: "Manufacturer Details",
        placeholder: "Information about the final product manufacturer",
        kind: FieldKind::TextArea,
    },
];

fn field_value<'a>(values: &'a HerbBatchSubmission, name: &str) -> &'a str {
    match name {
        "herbName" => &values.herb_name,
        "batchId" => &values.batch_id,
        "sourceLocation" => &values.source_location,
        "collectionTimestamp" => &values.collection_timestamp,
        "processingDetails" => &values.processing_details,
        "supplierDetails" => &values.supplier_details,
        "manufacturerDetails" => &values.manufacturer_details,
        _ => "",
    }
}

fn field_errors(out: &mut String, errors: &ValidationErrors, name: &str) {
    for message in errors.messages(name) {
        out.push_str(&format!(r#"<p class="field-error">{}</p>"#, text(message)));
    }
}

fn render_field(out: &mut String, field: &FormField, value: &str, errors: &ValidationErrors) {
    let invalid = if errors.contains(field.name) {
        r#" aria-invalid="true""#
    } else {
        ""
    };
    out.push_str(&format!(
        r#"<div class="field"><label for="{name}">{label}</label>"#,
        name = field.name,
        label = text(field.label),
    ));
    match field.kind {
        FieldKind::Input(kind) => {
            out.push_str(&format!(
                r#"<input id="{name}" name="{name}" type="{kind}" placeholder="{placeholder}" value="{value}"{invalid} required>"#,
                name = field.name,
                placeholder = attr(field.placeholder),
                value = attr(value),
            ));
        }
        FieldKind::TextArea => {
            out.push_str(&format!(
                r#"<textarea id="{name}" name="{name}" placeholder="{placeholder}"{invalid} required>{value}</textarea>"#,
                name = field.name,
                placeholder = attr(field.placeholder),
                value = text(value),
            ));
        }
    }
    if field.name == "sourceLocation" {
        out.push_str(r#"<button type="button" class="secondary" id="get-location">Get</button>"#);
    }
    field_errors(out, errors, field.name);
    out.push_str("</div>");
}

/// The new batch record form, with any inline validation messages.
pub fn render_record_form(values: &HerbBatchSubmission, errors: &ValidationErrors) -> String {
    let mut form = String::new();
    form.push_str(
        r#"<section class="intro"><h1>Trace Your Herb's Journey</h1>
<p>Record where and when a batch of Ayurvedic herbs was collected, how it was processed, and who handled it. An AI-generated origin report summarises the batch for consumers.</p></section>
<section class="card"><h2>New Batch Record</h2>
<form method="post" action="/records" enctype="multipart/form-data" id="record-form">"#,
    );

    for field in TEXT_FIELDS {
        render_field(&mut form, field, field_value(values, field.name), errors);
    }

    form.push_str(
        r#"<div class="field"><label for="photo">Herb Photo</label><input id="photo" name="photo" type="file" accept="image/jpeg,image/jpg,image/png,image/webp" required><p class="hint">Upload a clear photo of the collected herb batch. JPEG, PNG or WEBP, up to 5MB.</p>"#,
    );
    field_errors(&mut form, errors, "photo");
    form.push_str("</div>");

    for field in DETAIL_FIELDS {
        render_field(&mut form, field, field_value(values, field.name), errors);
    }

    form.push_str(
        r#"<button type="submit" id="submit">Create Record &amp; Generate Report</button>
</form></section>
<script>
document.getElementById('get-location').addEventListener('click', function () {
  if (!navigator.geolocation) { alert('Geolocation is not supported by this browser.'); return; }
  navigator.geolocation.getCurrentPosition(function (pos) {
    document.getElementById('sourceLocation').value =
      pos.coords.latitude.toFixed(6) + ', ' + pos.coords.longitude.toFixed(6);
  }, function (err) { alert('Could not get location: ' + err.message); });
});
var stamp = document.getElementById('collectionTimestamp');
function pad(n) { return String(n).padStart(2, '0'); }
var given = stamp.getAttribute('value');
if (given && /(Z|[+-]\d\d:\d\d)$/.test(given)) {
  var instant = new Date(given);
  if (!isNaN(instant)) {
    stamp.value = instant.getFullYear() + '-' + pad(instant.getMonth() + 1) + '-' +
      pad(instant.getDate()) + 'T' + pad(instant.getHours()) + ':' + pad(instant.getMinutes());
  }
}
document.getElementById('record-form').addEventListener('submit', function () {
  // Send the browser's local time as an absolute instant.
  var local = stamp.value ? new Date(stamp.value) : null;
  if (local && !isNaN(local)) {
    stamp.type = 'text';
    stamp.value = local.toISOString();
  }
  var button = document.getElementById('submit');
  button.disabled = true;
  button.textContent = 'Generating Report...';
});
</script>"#,
    );

    layout("New Batch Record", &form)
}

fn detail(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        r#"<div class="detail"><p class="detail-label">{}</p><p class="detail-value">{}</p></div>"#,
        text(label),
        text(value),
    ));
}

/// The report display page.
pub fn render_report(view: &ReportView, timestamp: &str, qr_image_url: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        r#"<h1>Herb Origin Report</h1>
<p class="lead">A transparent record for <strong>{herb}</strong> (Batch: {batch}).</p>
<div class="report-grid"><div class="report-main">
<section class="card"><h2>AI-Generated Summary</h2><p class="report-text">{report}</p></section>
<section class="card"><h2>Batch Details</h2><p class="hint">Core information recorded at the source.</p><div class="details">"#,
        herb = text(&view.herb_name),
        batch = text(&view.batch_id),
        report = text(&view.report),
    ));

    detail(&mut body, "Herb Name", &view.herb_name);
    detail(&mut body, "Batch ID", &view.batch_id);
    detail(&mut body, "Source Location", &view.source_location);
    detail(&mut body, "Collection Timestamp", timestamp);
    body.push_str(r#"</div><hr><div class="details">"#);
    detail(&mut body, "Processing Details", &view.processing_details);
    detail(&mut body, "Supplier Details", &view.supplier_details);
    detail(&mut body, "Manufacturer Details", &view.manufacturer_details);
    body.push_str(r#"</div></section></div><aside class="report-side"><section class="card"><h2>Traceability</h2>"#);

    if let Some(qr) = qr_image_url {
        body.push_str(&format!(
            r#"<img class="qr" src="{}" alt="QR Code for herb traceability" width="200" height="200">"#,
            attr(qr),
        ));
    }
    body.push_str(
        r#"<p class="hint">Scan this QR code to open this herb's origin report.</p></section>"#,
    );

    if let Some(photo) = &view.photo_url {
        body.push_str(&format!(
            r#"<section class="card"><h2>Collection Photo</h2><img class="photo" src="{}" alt="Herb collection"></section>"#,
            attr(photo),
        ));
    }
    body.push_str("</aside></div>");

    layout("Herb Origin Report", &body)
}

/// The generic error page.
pub fn render_error(message: &str) -> String {
    let body = format!(
        r#"<section class="card error"><h1>Something went wrong</h1><p>{}</p><p><a href="/">Back to the record form</a></p></section>"#,
        text(message),
    );
    layout("Error", &body)
}

/// The camera capture page.
pub fn render_scan(search_url: &str) -> String {
    let body = SCAN_PAGE.replace("{{SEARCH_URL}}", &attr(search_url));
    layout("Scan & Identify Herb", &body)
}

/// QR image URL encoding `data`, or `None` if the service URL is malformed.
pub fn qr_code_url(service_url: &str, data: &str) -> Option<String> {
    Url::parse_with_params(
        service_url,
        &[
            ("size", "200x200"),
            ("data", data),
            ("color", "46-71-48"),
            ("bgcolor", "241-248-233"),
            ("q", "H"),
        ],
    )
    .ok()
    .map(String::from)
}
