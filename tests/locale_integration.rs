use chrono::{Duration, TimeZone, Utc};
use jotter_core::config::NotesConfig;
use jotter_core::dates;
use jotter_core::locale::Locale;

#[test]
fn locale_parses_language_tags() {
    assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
    assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::En);
    assert_eq!("es_ES.UTF-8".parse::<Locale>().unwrap(), Locale::Es);
    assert_eq!(" ES ".parse::<Locale>().unwrap(), Locale::Es);
    assert!("fr".parse::<Locale>().is_err());
}

#[test]
fn locale_strings_differ_only_in_language() {
    assert_eq!(Locale::En.notes_dir_name(), "notes");
    assert_eq!(Locale::Es.notes_dir_name(), "notas");
    assert_eq!(Locale::En.storage_key(), "notes");
    assert_eq!(Locale::Es.storage_key(), "notas");
    assert_eq!(Locale::En.export_note_title("Plan"), "Export Plan");
    assert_eq!(Locale::Es.export_note_title("Plan"), "Exportar Plan");
}

#[test]
fn config_derives_paths_from_data_dir() {
    let config = NotesConfig::new("/data/jotter", Locale::Es);

    assert_eq!(config.notes_dir(), std::path::PathBuf::from("/data/jotter/notas"));
    assert_eq!(
        config.database_path(),
        std::path::PathBuf::from("/data/jotter/.jotter.db")
    );
    assert_eq!(config.storage_key(), "notas");
}

#[test]
fn short_dates_follow_locale_order() {
    let at = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();

    assert_eq!(dates::short_date(&at, Locale::En), "1/5/2024");
    assert_eq!(dates::short_date(&at, Locale::Es), "5/1/2024");
}

#[test]
fn display_dates_use_month_abbreviations() {
    let at = Utc.with_ymd_and_hms(2024, 9, 3, 21, 7, 0).unwrap();

    assert_eq!(dates::display_date(&at, Locale::En), "Sep 3, 2024");
    assert_eq!(dates::display_date(&at, Locale::Es), "3 sept 2024");
    assert_eq!(dates::display_date_time(&at, Locale::En), "Sep 3, 2024, 09:07 PM");
    assert_eq!(dates::display_date_time(&at, Locale::Es), "3 sept 2024, 21:07");
}

#[test]
fn relative_time_picks_largest_unit() {
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();

    assert_eq!(dates::relative_time(&now, &now, Locale::En), "Just now");
    assert_eq!(dates::relative_time(&now, &now, Locale::Es), "Ahora");

    let minute = now - Duration::seconds(61);
    assert_eq!(dates::relative_time(&minute, &now, Locale::En), "1 minute ago");
    assert_eq!(dates::relative_time(&minute, &now, Locale::Es), "Hace 1 minuto");

    let hours = now - Duration::hours(3);
    assert_eq!(dates::relative_time(&hours, &now, Locale::En), "3 hours ago");
    assert_eq!(dates::relative_time(&hours, &now, Locale::Es), "Hace 3 horas");

    let days = now - Duration::days(2) - Duration::hours(5);
    assert_eq!(dates::relative_time(&days, &now, Locale::En), "2 days ago");
    assert_eq!(dates::relative_time(&days, &now, Locale::Es), "Hace 2 días");

    // elapsed time is floored from milliseconds, not whole-second stamps
    let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
    let early = epoch + Duration::milliseconds(900);
    let late = epoch + Duration::milliseconds(60_500);
    assert_eq!(dates::relative_time(&early, &late, Locale::En), "Just now");
    assert_eq!(
        dates::relative_time(&early, &(late + Duration::milliseconds(400)), Locale::En),
        "1 minute ago"
    );

    let future = now + Duration::hours(1);
    assert_eq!(dates::relative_time(&future, &now, Locale::En), "Just now");
}
