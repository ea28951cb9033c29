use console::Style;
use hemascope_core::case::{CaseData, CellCount};
use hemascope_core::geometry::ImageSize;
use hemascope_core::render::RenderReport;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    warn: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            warn: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_table(s: &Styles, name: &str, rows: &[CellCount]) {
    println!("  {}", s.header.apply_to(name));
    for row in rows {
        println!(
            "    {:<24}{:>6}  {}",
            s.label.apply_to(&row.name),
            s.value.apply_to(row.count),
            row.percentage
        );
    }
    println!();
}

pub fn print_case_summary(case: &CaseData, image: Option<ImageSize>) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Hemascope Case"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(14)));
    println!();

    println!("  {:<14}{}", s.label.apply_to("Patient ID"), s.value.apply_to(&case.patient_id));
    println!("  {:<14}{}", s.label.apply_to("Sample type"), s.value.apply_to(&case.sample_type));
    if let Some(ref filename) = case.filename {
        println!("  {:<14}{}", s.label.apply_to("Filename"), filename);
    }
    match (&case.image, image) {
        (Some(path), Some(size)) => {
            println!("  {:<14}{}", s.label.apply_to("Image"), s.path.apply_to(path.display()));
            println!("  {:<14}{}x{}", s.label.apply_to("Dimensions"), size.width, size.height);
        }
        (Some(path), None) => println!(
            "  {:<14}{} {}",
            s.label.apply_to("Image"),
            s.path.apply_to(path.display()),
            s.warn.apply_to("(unreadable)")
        ),
        (None, _) => println!("  {:<14}{}", s.label.apply_to("Image"), s.warn.apply_to("none")),
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Detections"),
        s.value.apply_to(case.detection_count())
    );
    let confidence = case
        .confidence_score()
        .map(|score| format!("{score:.1}%"))
        .unwrap_or_else(|| "N/A".into());
    println!("  {:<14}{}", s.label.apply_to("Confidence"), s.value.apply_to(confidence));
    println!();

    print_table(&s, "RBC", &case.findings.rbc);
    print_table(&s, "WBC", &case.findings.wbc);
    println!("  {}", s.header.apply_to("Platelets"));
    println!(
        "    {:<24}{:>6}  {}",
        s.label.apply_to("Count"),
        s.value.apply_to(case.findings.platelets.count),
        case.findings.platelets.percentage
    );
    println!();
}

pub fn print_render_report(name: &str, report: &RenderReport) {
    let s = Styles::new();
    println!(
        "  {:<8}{:?}, {} drawn, {} hidden",
        s.label.apply_to(name),
        report.status,
        report.annotations_drawn,
        report.annotations_hidden
    );
    if let Some(crop) = report.crop {
        println!(
            "  {:<8}crop ({:.1}, {:.1}) {:.1}x{:.1}",
            "",
            crop.x,
            crop.y,
            crop.width,
            crop.height
        );
    }
    for skipped in &report.skipped {
        println!(
            "  {:<8}{}",
            "",
            s.warn.apply_to(format!("skipped #{}: {}", skipped.index, skipped.reason))
        );
    }
}
