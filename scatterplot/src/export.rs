//! Writing a drawn chart to disk.

use std::{io::Write, path::Path};

use app_core::string_error::ErrorStringExt;
use svg_export::Scene;

use crate::{
    app::config::Config,
    loader::load_path,
    plot::{PointGeometry, ScatterPlot},
};

pub fn save_svg(plot: &ScatterPlot<Scene>, path: &Path) -> Result<(), String> {
    log::debug!("requested to save svg at '{:?}'", path);
    let mut file = std::fs::File::create(path).err_to_string("unable to create svg file")?;
    file.write_all(plot.surface().to_svg().as_bytes())
        .err_to_string(&format!("could not write svg file {:?}", path))
}

pub fn save_geometry(plot: &ScatterPlot<Scene>, path: &Path) -> Result<(), String> {
    log::debug!("requested to save geometry at '{:?}'", path);
    let geometry: Vec<PointGeometry> = plot.geometry();
    let json = serde_json::to_string_pretty(&geometry).err_to_string("unable to serialize geometry")?;
    std::fs::write(path, json).err_to_string(&format!("could not write geometry file {:?}", path))
}

/// Load the configured dataset and draw it into a fresh scene.
pub fn build_plot(config: &Config) -> Result<ScatterPlot<Scene>, String> {
    let records = load_path(&config.data_path, config.policy)
        .err_to_string(&format!("could not load {:?}", config.data_path))?;
    let layout = config.layout();
    let mut plot = ScatterPlot::new(records, Scene::new(layout.width, layout.height), layout)
        .err_to_string("could not create scatterplot")?;
    plot.draw();
    Ok(plot)
}

/// Draw without a window and write the requested files.
pub fn run_headless(
    config: &Config,
    svg_path: Option<&Path>,
    geometry_path: Option<&Path>,
) -> Result<(), String> {
    let plot = build_plot(config)?;
    if let Some(path) = svg_path {
        save_svg(&plot, path)?;
        log::info!("wrote {:?}", path);
    }
    if let Some(path) = geometry_path {
        save_geometry(&plot, path)?;
        log::info!("wrote {:?}", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::loader::NumericPolicy;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scatterplot-{}-{}", std::process::id(), name))
    }

    fn write_data(name: &str) -> PathBuf {
        let path = temp_path(name);
        std::fs::write(
            &path,
            "country,population,gdp,ecc\nChina,1338.3,5.93,76.4\nIndia,1224.6,1.73,17.5\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_run_headless() {
        init();
        let config = Config {
            data_path: write_data("headless.csv"),
            ..Default::default()
        };
        let svg = temp_path("out.svg");
        let json = temp_path("out.json");
        run_headless(&config, Some(&svg), Some(&json)).unwrap();

        let svg_text = std::fs::read_to_string(&svg).unwrap();
        assert!(svg_text.starts_with("<svg"));
        assert_eq!(svg_text.matches("class=\"dot\"").count(), 2);
        assert!(svg_text.contains("Total Energy Consumption"));
        assert!(!svg_text.contains("tooltip"));

        let geometry: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(geometry.as_array().map(|a| a.len()), Some(2));
        assert_eq!(geometry[0]["name"], "China");
        assert_eq!(geometry[1]["fill"], "#ff7f0e");

        for path in [config.data_path, svg, json] {
            let _ = std::fs::remove_file(path);
        }
    }

    #[test]
    fn test_missing_data_is_reported() {
        init();
        let config = Config {
            data_path: temp_path("missing.csv"),
            policy: NumericPolicy::Strict,
            ..Default::default()
        };
        let err = run_headless(&config, None, None).unwrap_err();
        assert!(err.starts_with("could not load"), "{err}");
    }

    #[test]
    fn test_empty_data_is_reported() {
        init();
        let path = temp_path("empty.csv");
        std::fs::write(&path, "country,population,gdp,ecc\n").unwrap();
        let config = Config {
            data_path: path.clone(),
            ..Default::default()
        };
        let err = build_plot(&config).err().unwrap();
        assert!(err.contains("no plottable records"), "{err}");
        let _ = std::fs::remove_file(path);
    }
}
