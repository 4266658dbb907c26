use console::Style;
use runway_core::config::EstimatorConfig;
use runway_core::pipeline::StreamSummary;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    warn: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            warn: Style::new().yellow(),
        }
    }
}

pub fn print_config_summary(config: &EstimatorConfig, frame_count: usize) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Runway Alignment"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(16)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(frame_count)
    );
    let roi = &config.roi;
    println!(
        "  {:<14}{}",
        s.label.apply_to("ROI"),
        s.value.apply_to(format!(
            "{}x{} at ({}, {})",
            roi.width, roi.height, roi.x, roi.y
        ))
    );
    println!();

    println!("  {}", s.header.apply_to("Segmentation"));
    let c = &config.color;
    println!(
        "    {:<12}{}",
        s.label.apply_to("HSV low"),
        s.value.apply_to(format!("{:?}", c.low()))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("HSV high"),
        s.value.apply_to(format!("{:?}", c.high()))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Median"),
        s.value.apply_to(config.median_kernel)
    );
    println!();

    println!("  {}", s.header.apply_to("Detection"));
    let h = &config.hough;
    println!(
        "    {:<12}{}",
        s.label.apply_to("Hough"),
        s.value.apply_to(format!(
            "rho {} px, theta {} deg, {} votes",
            h.rho, h.theta_deg, h.threshold
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Segments"),
        s.value.apply_to(format!(
            "min length {}, max gap {}",
            h.min_length, h.max_gap
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Tolerance"),
        s.value.apply_to(format!("{} deg", config.slope.tolerance_deg))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Fit"),
        s.method.apply_to(config.fit)
    );
    println!();

    println!("  {}", s.header.apply_to("Geometry"));
    let g = &config.geometry;
    println!(
        "    {:<12}{}",
        s.label.apply_to("Ref slope"),
        s.value.apply_to(g.reference_slope)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Lateral"),
        s.value.apply_to(g.lateral_scale)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Min cross"),
        s.value.apply_to(g.min_crossing_sin)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Parallel"),
        s.method.apply_to(g.parallel_fallback)
    );
    println!();
}

pub fn print_stream_summary(summary: &StreamSummary) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Processed"),
        s.value.apply_to(summary.processed)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Aligned"),
        s.value.apply_to(summary.aligned)
    );
    if summary.skipped > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Skipped"),
            s.warn.apply_to(summary.skipped)
        );
    }
    println!();
}
