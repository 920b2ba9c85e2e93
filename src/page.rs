//! Form page rendering.
//!
//! One page, two themes. Every user-supplied value echoed back is escaped.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::Theme;
use crate::patient::{FormSubmission, LABEL_FEMALE, LABEL_MALE, LABEL_NO, LABEL_YES};
use crate::predictor::{Outcome, Prediction};

pub const DISCLAIMER: &str =
    "Hasil ini hanya prediksi dari model statistik dan bukan diagnosis medis. Konsultasikan dengan dokter.";

/// Everything the page needs for one render.
#[derive(Debug, Default)]
pub struct PageView<'a> {
    pub theme: Theme,
    pub form: Option<&'a FormSubmission>,
    pub prediction: Option<&'a Prediction>,
    pub validation_error: Option<&'a str>,
    /// Set when the model could not be loaded; the form is then locked.
    pub unavailable: Option<&'a str>,
}

const CLASSIC_CSS: &str = r#"
        body { font-family: "Source Sans Pro", sans-serif; background: #ffffff; color: #31333f; margin: 0; }
        main { max-width: 760px; margin: 0 auto; padding: 40px 20px; }
        h1 { font-size: 2rem; }
        .columns { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; }
        .field { margin-bottom: 18px; }
        .field label.title { display: block; font-weight: 600; margin-bottom: 6px; }
        .help { font-size: 0.8rem; color: #808495; }
        input[type=number] { width: 100%; padding: 6px; border: 1px solid #d6d6d9; border-radius: 4px; }
        button { background: #ff4b4b; color: #fff; border: none; padding: 10px 20px; border-radius: 6px; cursor: pointer; }
        .alert { padding: 14px; border-radius: 6px; margin: 16px 0; }
        .alert.die { background: #ffe6e6; color: #7d1a1a; }
        .alert.survive { background: #e6f7ec; color: #176b35; }
        .alert.error { background: #fff4e0; color: #7a4b00; }
        .disclaimer { font-size: 0.85rem; color: #808495; }
"#;

const MODERN_CSS: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; background: linear-gradient(135deg, #0f172a, #1e293b); color: #e2e8f0; margin: 0; min-height: 100vh; }
        main { max-width: 820px; margin: 0 auto; padding: 48px 24px; }
        h1 { font-size: 2.2rem; background: linear-gradient(90deg, #f43f5e, #fb923c); -webkit-background-clip: text; color: transparent; }
        .card { background: rgba(15, 23, 42, 0.75); border: 1px solid #334155; border-radius: 16px; padding: 24px; }
        .columns { display: grid; grid-template-columns: 1fr 1fr; gap: 28px; }
        .field { margin-bottom: 20px; }
        .field label.title { display: block; font-weight: 600; margin-bottom: 8px; color: #f8fafc; }
        .help { font-size: 0.8rem; color: #94a3b8; }
        input[type=number] { width: 100%; padding: 8px; background: #0f172a; color: #f8fafc; border: 1px solid #475569; border-radius: 8px; }
        button { background: linear-gradient(90deg, #f43f5e, #fb923c); color: #fff; border: none; padding: 12px 28px; border-radius: 999px; cursor: pointer; font-weight: 600; }
        .alert { padding: 16px; border-radius: 12px; margin: 18px 0; }
        .alert.die { background: rgba(244, 63, 94, 0.15); border: 1px solid #f43f5e; }
        .alert.survive { background: rgba(16, 185, 129, 0.15); border: 1px solid #10b981; }
        .alert.error { background: rgba(251, 191, 36, 0.15); border: 1px solid #fbbf24; }
        .disclaimer { font-size: 0.85rem; color: #94a3b8; }
"#;

fn css(theme: Theme) -> &'static str {
    match theme {
        Theme::Classic => CLASSIC_CSS,
        Theme::Modern => MODERN_CSS,
    }
}

fn value_or<'a>(form: Option<&'a FormSubmission>, pick: fn(&FormSubmission) -> &String, default: &'a str) -> &'a str {
    match form.map(pick) {
        Some(v) if !v.trim().is_empty() => v.as_str(),
        _ => default,
    }
}

struct NumberField<'a> {
    name: &'a str,
    label: &'a str,
    help: &'a str,
    min: &'a str,
    max: Option<&'a str>,
    step: &'a str,
    value: &'a str,
}

fn number_input(f: &NumberField<'_>) -> String {
    let max = f.max.map(|m| format!(r#" max="{}""#, m)).unwrap_or_default();
    format!(
        r#"<div class="field">
            <label class="title" for="{name}">{label}</label>
            <input type="number" id="{name}" name="{name}" min="{min}"{max} step="{step}" value="{value}">
            <div class="help">{help}</div>
        </div>"#,
        name = f.name,
        label = encode_text(f.label),
        min = f.min,
        max = max,
        step = f.step,
        value = encode_double_quoted_attribute(f.value),
        help = encode_text(f.help),
    )
}

fn radio_input(name: &str, label: &str, options: [&str; 2], selected: &str) -> String {
    let choices: String = options
        .iter()
        .map(|opt| {
            let checked = if *opt == selected { " checked" } else { "" };
            format!(
                r#"<label><input type="radio" name="{name}" value="{value}"{checked}> {text}</label> "#,
                name = name,
                value = encode_double_quoted_attribute(opt),
                checked = checked,
                text = encode_text(opt),
            )
        })
        .collect();
    format!(
        r#"<div class="field"><label class="title">{label}</label>{choices}</div>"#,
        label = encode_text(label),
        choices = choices,
    )
}

fn result_panel(prediction: &Prediction) -> String {
    let (class, icon) = match prediction.outcome {
        Outcome::Die => ("die", "⚠️"),
        Outcome::Survive => ("survive", "✅"),
    };
    format!(
        r#"<section id="result">
        <h2>Hasil Prediksi</h2>
        <div class="alert {class}" data-outcome="{outcome}">{icon} {message}</div>
        <p class="disclaimer">{disclaimer}</p>
    </section>"#,
        class = class,
        outcome = prediction.outcome.as_str(),
        icon = icon,
        message = encode_text(prediction.outcome.message()),
        disclaimer = encode_text(DISCLAIMER),
    )
}

pub fn render(view: &PageView<'_>) -> String {
    let form = view.form;
    let locked = view.unavailable.is_some();

    let sex = value_or(form, |f| &f.sex, LABEL_FEMALE);
    let anaemia = value_or(form, |f| &f.anaemia, LABEL_NO);
    let diabetes = value_or(form, |f| &f.diabetes, LABEL_NO);
    let smoking = value_or(form, |f| &f.smoking, LABEL_NO);
    let hbp = value_or(form, |f| &f.high_blood_pressure, LABEL_NO);

    let left_column = [
        number_input(&NumberField {
            name: "age",
            label: "Usia (tahun)",
            help: "Usia pasien saat pemeriksaan",
            min: "1",
            max: Some("120"),
            step: "1",
            value: value_or(form, |f| &f.age, "1"),
        }),
        radio_input("sex", "Jenis Kelamin", [LABEL_FEMALE, LABEL_MALE], sex),
        radio_input("anaemia", "Apakah pasien mengalami anaemia?", [LABEL_NO, LABEL_YES], anaemia),
        radio_input("diabetes", "Apakah pasien memiliki diabetes?", [LABEL_NO, LABEL_YES], diabetes),
        radio_input("smoking", "Apakah pasien merokok?", [LABEL_NO, LABEL_YES], smoking),
        radio_input("high_blood_pressure", "Tekanan darah tinggi?", [LABEL_NO, LABEL_YES], hbp),
    ]
    .concat();

    let right_column = [
        number_input(&NumberField {
            name: "creatinine_phosphokinase",
            label: "Creatinine Phosphokinase",
            help: "Kadar enzim CPK dalam darah",
            min: "0",
            max: None,
            step: "any",
            value: value_or(form, |f| &f.creatinine_phosphokinase, "0"),
        }),
        number_input(&NumberField {
            name: "ejection_fraction",
            label: "Ejection Fraction (%)",
            help: "Persentase darah yang dipompa keluar oleh jantung",
            min: "0",
            max: Some("100"),
            step: "1",
            value: value_or(form, |f| &f.ejection_fraction, "0"),
        }),
        number_input(&NumberField {
            name: "platelets",
            label: "Jumlah Platelets",
            help: "Jumlah trombosit dalam darah",
            min: "0",
            max: None,
            step: "any",
            value: value_or(form, |f| &f.platelets, "0"),
        }),
        number_input(&NumberField {
            name: "serum_creatinine",
            label: "Serum Creatinine",
            help: "Tingkat kreatinin dalam serum darah",
            min: "0",
            max: None,
            step: "any",
            value: value_or(form, |f| &f.serum_creatinine, "0"),
        }),
        number_input(&NumberField {
            name: "serum_sodium",
            label: "Serum Sodium",
            help: "Tingkat sodium dalam serum darah",
            min: "0",
            max: None,
            step: "any",
            value: value_or(form, |f| &f.serum_sodium, "0"),
        }),
        number_input(&NumberField {
            name: "time",
            label: "Waktu pengamatan (hari)",
            help: "Jumlah hari pasien diamati sejak pemeriksaan",
            min: "0",
            max: None,
            step: "1",
            value: value_or(form, |f| &f.time, "0"),
        }),
    ]
    .concat();

    let banner = match (view.unavailable, view.validation_error) {
        (Some(reason), _) => format!(
            r#"<div class="alert error" id="unavailable">Model prediksi tidak dapat dimuat: {}. Formulir dinonaktifkan sampai model tersedia.</div>"#,
            encode_text(reason)
        ),
        (None, Some(msg)) => format!(
            r#"<div class="alert error" id="validation">Input tidak valid: {}</div>"#,
            encode_text(msg)
        ),
        (None, None) => String::new(),
    };

    let submit = if locked {
        String::new()
    } else {
        r#"<button type="submit">🔍 Prediksi</button>"#.to_string()
    };
    let disabled = if locked { " disabled" } else { "" };
    let result = view.prediction.map(result_panel).unwrap_or_default();
    let card = match view.theme {
        Theme::Classic => "",
        Theme::Modern => " class=\"card\"",
    };

    format!(
        r####"<!DOCTYPE html>
<html lang="id">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Prediksi Kematian Pasien</title>
    <style>{css}</style>
</head>
<body>
<main>
    <h1>💉 Prediksi Kematian Pasien Gagal Jantung</h1>
    <p>Aplikasi ini memprediksi apakah pasien dengan gagal jantung berisiko meninggal berdasarkan beberapa parameter medis.</p>
    <hr>
    {banner}
    <form method="post" action="/predict"{card}>
        <h2>📝 Input Data Pasien</h2>
        <fieldset{disabled} style="border: none; padding: 0; margin: 0;">
            <div class="columns">
                <div>{left}</div>
                <div>{right}</div>
            </div>
        </fieldset>
        <hr>
        {submit}
    </form>
    {result}
</main>
</body>
</html>"####,
        css = css(view.theme),
        banner = banner,
        card = card,
        disabled = disabled,
        left = left_column,
        right = right_column,
        submit = submit,
        result = result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::FeatureVector;

    fn prediction(outcome: Outcome) -> Prediction {
        Prediction {
            outcome,
            raw: if outcome == Outcome::Die { 1 } else { 0 },
            features: FeatureVector::new([0.0; 12]),
        }
    }

    #[test]
    fn test_blank_form() {
        let html = render(&PageView::default());
        assert!(html.contains(r#"name="age" min="1" max="120""#));
        assert!(html.contains(r#"name="sex" value="Perempuan" checked"#));
        assert!(html.contains("🔍 Prediksi"));
        assert!(!html.contains("Hasil Prediksi"));
    }

    #[test]
    fn test_result_messages() {
        let die = prediction(Outcome::Die);
        let html = render(&PageView {
            prediction: Some(&die),
            ..Default::default()
        });
        assert!(html.contains("MENINGGAL"));
        assert!(html.contains(DISCLAIMER));

        let live = prediction(Outcome::Survive);
        let html = render(&PageView {
            prediction: Some(&live),
            ..Default::default()
        });
        assert!(html.contains("BERTAHAN HIDUP"));
    }

    #[test]
    fn test_unavailable_locks_form() {
        let html = render(&PageView {
            unavailable: Some("model artifact not found at x.json"),
            ..Default::default()
        });
        assert!(html.contains("<fieldset disabled"));
        assert!(!html.contains("<button"));
        assert!(html.contains("model artifact not found at x.json"));
    }

    #[test]
    fn test_submitted_values_are_kept_and_escaped() {
        let form = FormSubmission {
            age: "\"><script>".into(),
            sex: LABEL_MALE.into(),
            ..Default::default()
        };
        let html = render(&PageView {
            form: Some(&form),
            ..Default::default()
        });
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"name="sex" value="Laki-laki" checked"#));
    }

    #[test]
    fn test_themes_differ_only_in_styling() {
        let classic = render(&PageView::default());
        let modern = render(&PageView {
            theme: Theme::Modern,
            ..Default::default()
        });
        assert!(classic.contains("#ff4b4b"));
        assert!(modern.contains("linear-gradient"));
        assert!(modern.contains(r#"<form method="post" action="/predict" class="card">"#));
        for page in [&classic, &modern] {
            assert!(page.contains(r#"name="time""#));
        }
    }
}
