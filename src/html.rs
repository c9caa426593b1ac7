//! Static chart page.
//!
//! Renders a [`Chart`] as a self-contained HTML document drawn by plotly.js,
//! with the same log-log axes, ticks and hover text as the dashboard.

use serde_json::{json, Value};

use crate::chart::{Chart, LensSeries, APERTURE_TICKS, FOCAL_TICKS};
use crate::color::to_hex;
use crate::config::{CHART_TITLE, DATA_SOURCE_URL};

/// Prepended to the generated markup so the chart fills the window.
pub const STYLE_OVERRIDE: &str = "<style>body {margin:0;}</style>\n";

/// Render the full document. `plotly_src` is the script URL for plotly.js.
pub fn render_chart_page(chart: &Chart, plotly_src: &str) -> String {
    let traces: Vec<Value> = chart.series.iter().map(trace).collect();
    let data = script_json(&Value::Array(traces));
    let layout = script_json(&layout(chart));

    format!(
        r#"{style}<html>
<head>
    <meta charset="utf-8" />
    <title>{title}</title>
    <script src="{plotly_src}" charset="utf-8"></script>
</head>
<body>
    <div id="lens-chart" style="height:100vh; width:100%;"></div>
    <script type="text/javascript">
        Plotly.newPlot("lens-chart", {data}, {layout}, {{"responsive": true}});
    </script>
</body>
</html>
"#,
        style = STYLE_OVERRIDE,
        title = escape_html(CHART_TITLE),
    )
}

fn trace(series: &LensSeries) -> Value {
    let [r, g, b] = series.color;
    let color = to_hex(palette::Srgb::new(r, g, b));
    let hover = format!("{}<extra></extra>", series.hover.join("<br>"));

    json!({
        "type": "scatter",
        "mode": "lines+markers",
        "name": series.name,
        "legendgroup": series.name,
        "x": series.focal_length,
        "y": series.aperture,
        "opacity": series.opacity,
        "marker": { "size": series.size, "color": color },
        "line": { "width": series.size, "color": color },
        "hovertemplate": hover,
    })
}

fn layout(chart: &Chart) -> Value {
    let title = format!(
        "<b>{CHART_TITLE}</b><br>List by <a href=\"{DATA_SOURCE_URL}\">phillipreeve.net</a>\
         <br>Size indicates weight"
    );
    json!({
        "title": { "text": title, "x": 0.5 },
        "showlegend": chart.show_legend,
        "paper_bgcolor": "rgb(17,17,17)",
        "plot_bgcolor": "rgb(17,17,17)",
        "font": { "color": "#f2f5fa" },
        "hovermode": "closest",
        "xaxis": {
            "title": { "text": "Focal Length" },
            "type": "log",
            "tickmode": "array",
            "tickvals": FOCAL_TICKS,
            "gridcolor": "#283442",
        },
        "yaxis": {
            "title": { "text": "Aperture" },
            "type": "log",
            "tickmode": "array",
            "tickvals": APERTURE_TICKS,
            "gridcolor": "#283442",
            "automargin": true,
        },
    })
}

/// JSON that is safe to place inside a `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ManufacturerColors;
    use crate::data::model::tests::lens;
    use crate::data::model::LensCatalog;

    fn chart() -> Chart {
        let catalog = LensCatalog::from_records(vec![
            lens("FE 24-70mm F2.8 GM", "Sony", &[24.0, 70.0], &[2.8, 2.8], 886.0),
            lens("Evil </script> 50mm", "Sony", &[50.0], &[1.8], 186.0),
        ]);
        Chart::full(&catalog, &ManufacturerColors::new(&catalog))
    }

    #[test]
    fn page_starts_with_style_override() {
        let page = render_chart_page(&chart(), "https://cdn.plot.ly/plotly-2.35.2.min.js");
        assert!(page.starts_with("<style>body {margin:0;}</style>\n<html>"));
        assert!(page.contains(r#"<script src="https://cdn.plot.ly/plotly-2.35.2.min.js""#));
        assert!(page.contains("Plotly.newPlot(\"lens-chart\""));
    }

    #[test]
    fn script_tags_in_names_are_escaped() {
        let page = render_chart_page(&chart(), "plotly.js");
        assert_eq!(page.matches("</script>").count(), 2);
        assert!(page.contains("Evil <\\/script> 50mm"));
    }

    #[test]
    fn traces_follow_series() {
        let chart = chart();
        let t = trace(&chart.series[0]);
        assert_eq!(t["mode"], "lines+markers");
        assert_eq!(t["x"], json!([24.0, 70.0]));
        assert_eq!(t["y"], json!([2.8, 2.8]));
        assert_eq!(t["line"]["color"], "#fd3216");
        assert!(t["hovertemplate"].as_str().unwrap().ends_with("<extra></extra>"));

        let l = layout(&chart);
        assert_eq!(l["xaxis"]["type"], "log");
        assert_eq!(l["yaxis"]["tickvals"][3], json!(2.8));
    }
}
