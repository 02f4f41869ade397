use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::{Arg, Response};
use crate::session::Session;
use crate::transport::Transport;

use super::{Category, CategoryApi, Point, Scope};

/// Post-processor selection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    Point,
    Contour,
    Area,
}

impl EditMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            EditMode::Point => "point",
            EditMode::Contour => "contour",
            EditMode::Area => "area",
        }
    }
}

/// Options of `showdensityplot`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DensityPlot {
    #[serde(default)]
    pub legend: bool,
    #[serde(default)]
    pub grey_scale: bool,
    pub upper_bound: Option<f64>,
    pub lower_bound: Option<f64>,
    /// e.g. `bmag`, `breal`, `hmag`, `jreal`
    pub plot_type: Option<String>,
}

/// Post-processor commands (`o` category)
pub struct Postprocessor<'s, T: Transport> {
    api: CategoryApi<'s, T>,
}

impl<'s, T: Transport> Postprocessor<'s, T> {
    pub fn new(session: &'s mut Session<T>) -> Self {
        Self {
            api: CategoryApi::new(session, Category::Postprocessor),
        }
    }

    /// Line integral of kind `integral_type` along the defined contour
    pub fn line_integral(&mut self, integral_type: i64) -> Result<Response> {
        self.api.call_with_args("lineintegral", &[integral_type.into()])
    }

    /// Block integral of kind `integral_type` over the selected blocks
    pub fn block_integral(&mut self, integral_type: i64) -> Result<Response> {
        self.api.call_with_args("blockintegral", &[integral_type.into()])
    }

    /// Field values at `p`, in the engine's fixed order
    pub fn get_point_values(&mut self, p: Point) -> Result<Response> {
        self.api.call_with_args("getpointvalues", &[p.x.into(), p.y.into()])
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) -> Result<()> {
        self.api.call_with_args("seteditmode", &[mode.as_str().into()])?;
        Ok(())
    }

    /// Select the block containing `p`
    pub fn select_block(&mut self, p: Point) -> Result<()> {
        self.api.call_with_args("selectblock", &[p.x.into(), p.y.into()])?;
        Ok(())
    }

    /// Select every block labelled in `group`, or all blocks when `None`
    pub fn group_select_block(&mut self, group: Option<i64>) -> Result<()> {
        match group {
            Some(group) => self.api.call_with_args("groupselectblock", &[group.into()])?,
            None => self.api.call(Scope::Domain, "groupselectblock", &[])?,
        };
        Ok(())
    }

    /// Show a density plot; `None` lets the engine use its defaults
    pub fn show_density_plot(&mut self, plot: Option<&DensityPlot>) -> Result<()> {
        match plot {
            None => self.api.call_with_args("showdensityplot", &[Arg::Int(-1)])?,
            Some(plot) => {
                let flag = |b: bool| Arg::from(if b { "1" } else { "0" });
                self.api.call_with_args(
                    "showdensityplot",
                    &[
                        flag(plot.legend),
                        flag(plot.grey_scale),
                        plot.upper_bound.into(),
                        plot.lower_bound.into(),
                        plot.plot_type.as_ref().into(),
                    ],
                )?
            }
        };
        Ok(())
    }
}
