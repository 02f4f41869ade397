use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::{Arg, Response};
use crate::session::Session;
use crate::transport::Transport;

use super::{Category, CategoryApi, Point, Scope, rectangle_corners};

/// Block label properties for `setblockprop`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockProps {
    pub block_name: Option<String>,
    /// Let the mesher choose the density instead of `mesh_size`
    #[serde(default)]
    pub auto_mesh: bool,
    pub mesh_size: Option<f64>,
    pub in_circuit: Option<String>,
    pub mag_direction: Option<MagDirection>,
    pub group: Option<i64>,
    pub turns: Option<i64>,
}

/// Magnetization direction of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MagDirection {
    /// Angle in degrees
    Angle(f64),
    /// Expression in `theta`, `R`, `x`, `y` (or `r`, `z` when axisymmetric)
    Formula(String),
}

impl From<&MagDirection> for Arg {
    fn from(value: &MagDirection) -> Self {
        match value {
            MagDirection::Angle(a) => Arg::Float(*a),
            MagDirection::Formula(f) => Arg::Str(f.clone()),
        }
    }
}

/// Boundary properties for `setsegmentprop`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentProps {
    pub prop_name: Option<String>,
    pub element_size: Option<f64>,
    #[serde(default)]
    pub auto_mesh: bool,
    /// Hidden in the post-processor
    #[serde(default)]
    pub hide: bool,
    pub group: Option<i64>,
}

/// Properties for `setarcsegmentprop`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcSegmentProps {
    /// Maximum degrees per discretized arc segment
    pub max_seg_deg: Option<f64>,
    pub prop_name: Option<String>,
    #[serde(default)]
    pub hide: bool,
    pub group: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Inches,
    Millimeters,
    Centimeters,
    Mils,
    Meters,
    Micrometers,
}

impl LengthUnit {
    pub const fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Inches => "inches",
            LengthUnit::Millimeters => "millimeters",
            LengthUnit::Centimeters => "centimeters",
            LengthUnit::Mils => "mils",
            LengthUnit::Meters => "meters",
            LengthUnit::Micrometers => "micrometers",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemType {
    Planar,
    Axi,
}

impl ProblemType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ProblemType::Planar => "planar",
            ProblemType::Axi => "axi",
        }
    }
}

/// Arguments of `probdef`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemDefinition {
    /// Hertz
    pub frequency: Option<f64>,
    pub units: Option<LengthUnit>,
    pub problem_type: Option<ProblemType>,
    /// Required RMS of the solver residual, e.g. `1e-8`
    pub precision: Option<f64>,
    /// Into-the-page depth for planar problems
    pub depth: Option<f64>,
    /// Minimum angle constraint for the mesher
    pub minimum_angle: Option<f64>,
    pub ac_solver: Option<i64>,
}

/// Material parameters for `addmaterial`; unset values are sent as `<None>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub mu_x: Option<f64>,
    pub mu_y: Option<f64>,
    pub h_c: Option<f64>,
    pub j: Option<f64>,
    pub c_duct: Option<f64>,
    pub lam_d: Option<f64>,
    pub phi_hmax: Option<f64>,
    pub lam_fill: Option<f64>,
    pub lam_type: Option<i64>,
    pub phi_hx: Option<f64>,
    pub phi_hy: Option<f64>,
    pub number_of_strands: Option<i64>,
    pub wire_diameter: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircuitType {
    #[default]
    Parallel,
    Series,
}

impl CircuitType {
    pub const fn code(self) -> i64 {
        match self {
            CircuitType::Parallel => 0,
            CircuitType::Series => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OuterEdge {
    Dirichlet,
    Neumann,
}

/// Explicit parameters for an asymptotic boundary built from shells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbcSpec {
    pub center: Point,
    /// Between 1 and 10
    pub shells: u32,
    pub radius: f64,
    pub outer_edge: OuterEdge,
}

/// Pre-processor commands (`i` category)
pub struct Preprocessor<'s, T: Transport> {
    api: CategoryApi<'s, T>,
}

impl<'s, T: Transport> Preprocessor<'s, T> {
    pub fn new(session: &'s mut Session<T>) -> Self {
        Self {
            api: CategoryApi::new(session, Category::Preprocessor),
        }
    }

    /// Close the current pre-processor document
    pub fn close(&mut self) -> Result<()> {
        self.api.call(Scope::Domain, "close", &[])?;
        Ok(())
    }

    // Object add/remove

    pub fn add_node(&mut self, p: Point, group: Option<i64>) -> Result<()> {
        self.api.call_with_args("addnode", &[p.x.into(), p.y.into()])?;
        if let Some(group) = group {
            self.select_node(p)?;
            self.set_group(group)?;
            self.clear_selected()?;
        }
        Ok(())
    }

    /// Segment between the nodes closest to `a` and `b`
    pub fn add_segment(&mut self, a: Point, b: Point, group: Option<i64>) -> Result<()> {
        self.api
            .call_with_args("addsegment", &[a.x.into(), a.y.into(), b.x.into(), b.y.into()])?;
        if let Some(group) = group {
            self.select_segment(a, b)?;
            self.set_segment_prop(&SegmentProps {
                group: Some(group),
                ..Default::default()
            })?;
            self.clear_selected()?;
        }
        Ok(())
    }

    /// Block label at `p`; when `props` is given the label is selected,
    /// assigned the properties and deselected
    pub fn add_block_label(&mut self, p: Point, props: Option<&BlockProps>) -> Result<()> {
        self.api.call_with_args("addblocklabel", &[p.x.into(), p.y.into()])?;
        if let Some(props) = props {
            self.select_label(p)?;
            self.set_block_prop(props)?;
            self.clear_selected()?;
        }
        Ok(())
    }

    /// Arc from the node nearest `a` to the node nearest `b` spanning
    /// `angle` degrees in `max_seg` segments
    pub fn add_arc(
        &mut self,
        a: Point,
        b: Point,
        angle: f64,
        max_seg: f64,
        group: Option<i64>,
    ) -> Result<()> {
        self.api.call_with_args(
            "addarc",
            &[
                a.x.into(),
                a.y.into(),
                b.x.into(),
                b.y.into(),
                angle.into(),
                max_seg.into(),
            ],
        )?;
        if let Some(group) = group {
            self.select_arc_segment(a, b)?;
            self.set_group(group)?;
            self.clear_selected()?;
        }
        Ok(())
    }

    // Drawing helpers

    pub fn draw_line(&mut self, a: Point, b: Point, group: Option<i64>) -> Result<()> {
        self.add_node(a, group)?;
        self.add_node(b, group)?;
        self.add_segment(a, b, group)
    }

    /// Nodes at every point joined by segments in order
    pub fn draw_polyline(&mut self, points: &[Point], group: Option<i64>) -> Result<()> {
        for p in points {
            self.add_node(*p, group)?;
        }
        for pair in points.windows(2) {
            self.add_segment(pair[0], pair[1], group)?;
        }
        Ok(())
    }

    /// Closed contour through every point
    pub fn draw_polygon(&mut self, points: &[Point], group: Option<i64>) -> Result<()> {
        self.draw_polyline(points, group)?;
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            if points.len() > 2 {
                self.add_segment(*last, *first, group)?;
            }
        }
        Ok(())
    }

    pub fn draw_arc(
        &mut self,
        a: Point,
        b: Point,
        angle: f64,
        max_seg: f64,
        group: Option<i64>,
    ) -> Result<()> {
        self.add_node(a, group)?;
        self.add_node(b, group)?;
        self.add_arc(a, b, angle, max_seg, group)
    }

    /// Two half arcs through the top and bottom of the circle
    pub fn draw_circle(
        &mut self,
        center: Point,
        radius: f64,
        max_seg: f64,
        group: Option<i64>,
    ) -> Result<()> {
        let top = center.offset(0.0, radius);
        let bottom = center.offset(0.0, -radius);
        self.draw_arc(top, bottom, 180.0, max_seg, group)?;
        self.draw_arc(bottom, top, 180.0, max_seg, group)
    }

    pub fn draw_annulus(
        &mut self,
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        max_seg: f64,
        group: Option<i64>,
    ) -> Result<()> {
        self.draw_circle(center, inner_radius, max_seg, group)?;
        self.draw_circle(center, outer_radius, max_seg, group)
    }

    /// Rectangle spanned by two opposite corners
    pub fn draw_rectangle(&mut self, a: Point, b: Point, group: Option<i64>) -> Result<()> {
        self.draw_polygon(&rectangle_corners(a, b), group)
    }

    /// Draw `points` with `draw`, then again `repeat - 1` more times, each
    /// copy rotated a further `2π / repeat` around `center`.
    ///
    /// `draw` receives the copy's points and its index, starting at 0 for
    /// the unrotated original. Rotated coordinates are rounded to 5 decimal
    /// places. Returns the point set of every copy in order.
    pub fn draw_pattern<F>(
        &mut self,
        points: &[Point],
        center: Point,
        repeat: usize,
        mut draw: F,
    ) -> Result<Vec<Vec<Point>>>
    where
        F: FnMut(&mut Self, &[Point], usize) -> Result<()>,
    {
        let step = std::f64::consts::TAU / repeat as f64;
        let mut copies = Vec::with_capacity(repeat);
        for i in 0..repeat {
            let copy: Vec<Point> = if i == 0 {
                points.to_vec()
            } else {
                let angle = step * i as f64;
                points
                    .iter()
                    .map(|p| p.rotate_about(center, angle).rounded(5))
                    .collect()
            };
            draw(self, &copy, i)?;
            copies.push(copy);
        }
        Ok(copies)
    }

    pub fn delete_selected(&mut self) -> Result<()> {
        self.api.call(Scope::Category, "deleteselected", &[])?;
        Ok(())
    }

    pub fn delete_selected_nodes(&mut self) -> Result<()> {
        self.api.call(Scope::Category, "deleteselectednodes", &[])?;
        Ok(())
    }

    pub fn delete_selected_labels(&mut self) -> Result<()> {
        self.api.call(Scope::Domain, "deleteselectedlabels", &[])?;
        Ok(())
    }

    pub fn delete_selected_segments(&mut self) -> Result<()> {
        self.api.call(Scope::Category, "deleteselectedsegments", &[])?;
        Ok(())
    }

    pub fn delete_selected_arc_segments(&mut self) -> Result<()> {
        self.api.call(Scope::Category, "deleteselectedarcsegments", &[])?;
        Ok(())
    }

    // Selection

    /// Clear all selected nodes, blocks, segments and arc segments
    pub fn clear_selected(&mut self) -> Result<()> {
        self.api.call(Scope::Domain, "clearselected", &[])?;
        Ok(())
    }

    /// Select the segment closest to the midpoint of `a`-`b`
    pub fn select_segment(&mut self, a: Point, b: Point) -> Result<()> {
        let mid = a.midpoint(b);
        self.api.call_with_args("selectsegment", &[mid.x.into(), mid.y.into()])?;
        Ok(())
    }

    /// Select the node closest to `p`; the engine replies with its coordinates
    pub fn select_node(&mut self, p: Point) -> Result<Response> {
        self.api.call_with_args("selectnode", &[p.x.into(), p.y.into()])
    }

    pub fn select_label(&mut self, p: Point) -> Result<Response> {
        self.api.call_with_args("selectlabel", &[p.x.into(), p.y.into()])
    }

    pub fn select_arc_segment(&mut self, a: Point, b: Point) -> Result<()> {
        let mid = a.midpoint(b);
        self.api
            .call_with_args("selectarcsegment", &[mid.x.into(), mid.y.into()])?;
        Ok(())
    }

    /// Select every object in `group`, clearing the previous selection
    pub fn select_group(&mut self, group: i64) -> Result<()> {
        self.api.call_with_args("selectgroup", &[group.into()])?;
        Ok(())
    }

    // Object labeling

    pub fn set_node_prop(&mut self, prop_name: Option<&str>, group: Option<i64>) -> Result<()> {
        self.api
            .call_with_args("setnodeprop", &[prop_name.into(), group.into()])?;
        Ok(())
    }

    pub fn set_block_prop(&mut self, props: &BlockProps) -> Result<()> {
        let mag_direction = props
            .mag_direction
            .as_ref()
            .map_or(Arg::Bool(false), Arg::from);
        self.api.call_with_args(
            "setblockprop",
            &[
                props.block_name.as_ref().into(),
                props.auto_mesh.into(),
                props.mesh_size.into(),
                props.in_circuit.as_ref().into(),
                mag_direction,
                props.group.into(),
                props.turns.into(),
            ],
        )?;
        Ok(())
    }

    pub fn set_segment_prop(&mut self, props: &SegmentProps) -> Result<()> {
        self.api.call_with_args(
            "setsegmentprop",
            &[
                props.prop_name.as_ref().into(),
                props.element_size.into(),
                props.auto_mesh.into(),
                props.hide.into(),
                props.group.into(),
            ],
        )?;
        Ok(())
    }

    pub fn set_arc_segment_prop(&mut self, props: &ArcSegmentProps) -> Result<()> {
        self.api.call_with_args(
            "setarcsegmentprop",
            &[
                props.max_seg_deg.into(),
                props.prop_name.as_ref().into(),
                props.hide.into(),
                props.group.into(),
            ],
        )?;
        Ok(())
    }

    /// Assign the selected items to `group`
    pub fn set_group(&mut self, group: i64) -> Result<()> {
        self.api.call_with_args("setgroup", &[group.into()])?;
        Ok(())
    }

    // Problem

    pub fn problem_definition(&mut self, def: &ProblemDefinition) -> Result<()> {
        self.api.call_with_args(
            "probdef",
            &[
                def.frequency.into(),
                def.units.map(LengthUnit::as_str).into(),
                def.problem_type.map(ProblemType::as_str).into(),
                def.precision.into(),
                def.depth.into(),
                def.minimum_angle.into(),
                def.ac_solver.into(),
            ],
        )?;
        Ok(())
    }

    /// Run the solver; `minimized` hides the solver window
    pub fn analyze(&mut self, minimized: bool) -> Result<()> {
        let flag = if minimized { "1" } else { "0" };
        self.api.call_with_args("analyze", &[flag.into()])?;
        Ok(())
    }

    pub fn load_solution(&mut self) -> Result<()> {
        self.api.call(Scope::Domain, "loadsolution", &[])?;
        Ok(())
    }

    /// Save under `filename`; forward slashes are sent as backslashes
    pub fn save_as(&mut self, filename: &str) -> Result<()> {
        let filename = filename.replace('/', "\\");
        self.api.call_with_args("saveas", &[filename.into()])?;
        Ok(())
    }

    // Mesh

    /// Mesh the geometry; the engine replies with the element count
    pub fn create_mesh(&mut self) -> Result<Response> {
        self.api.call(Scope::Domain, "createmesh", &[])
    }

    pub fn show_mesh(&mut self) -> Result<()> {
        self.api.call(Scope::Domain, "showmesh", &[])?;
        Ok(())
    }

    // Zoom

    pub fn zoom_natural(&mut self) -> Result<()> {
        self.api.call(Scope::Domain, "zoomnatural", &[])?;
        Ok(())
    }

    pub fn zoom_out(&mut self) -> Result<()> {
        self.api.call(Scope::Domain, "zoomout", &[])?;
        Ok(())
    }

    pub fn zoom_in(&mut self) -> Result<()> {
        self.api.call(Scope::Domain, "zoomin", &[])?;
        Ok(())
    }

    /// Show the area from bottom-left `a` to top-right `b`
    pub fn zoom(&mut self, a: Point, b: Point) -> Result<()> {
        self.api
            .call_with_args("zoom", &[a.x.into(), a.y.into(), b.x.into(), b.y.into()])?;
        Ok(())
    }

    // Object properties

    /// Copy `material_name` from the materials library into the model
    pub fn get_material(&mut self, material_name: &str) -> Result<()> {
        self.api.call_with_args("getmaterial", &[material_name.into()])?;
        Ok(())
    }

    pub fn add_material(&mut self, material_name: &str, material: &Material) -> Result<()> {
        self.api.call_with_args(
            "addmaterial",
            &[
                material_name.into(),
                material.mu_x.into(),
                material.mu_y.into(),
                material.h_c.into(),
                material.j.into(),
                material.c_duct.into(),
                material.lam_d.into(),
                material.phi_hmax.into(),
                material.lam_fill.into(),
                material.lam_type.into(),
                material.phi_hx.into(),
                material.phi_hy.into(),
                material.number_of_strands.into(),
                material.wire_diameter.into(),
            ],
        )?;
        Ok(())
    }

    pub fn add_circuit_prop(
        &mut self,
        circuit_name: &str,
        current: f64,
        circuit_type: CircuitType,
    ) -> Result<()> {
        self.api.call_with_args(
            "addcircprop",
            &[circuit_name.into(), current.into(), circuit_type.code().into()],
        )?;
        Ok(())
    }

    /// Property numbers: 0 name, 1 A, 2 J
    pub fn modify_point_prop(
        &mut self,
        point_name: &str,
        prop_number: i64,
        value: impl Into<Arg>,
    ) -> Result<()> {
        self.api.call_with_args(
            "modifypointprop",
            &[point_name.into(), prop_number.into(), value.into()],
        )?;
        Ok(())
    }

    /// Property numbers: 0 name, 1 current, 2 circuit type
    pub fn modify_circuit_prop(
        &mut self,
        circuit_name: &str,
        prop_number: i64,
        value: impl Into<Arg>,
    ) -> Result<()> {
        self.api.call_with_args(
            "modifycircprop",
            &[circuit_name.into(), prop_number.into(), value.into()],
        )?;
        Ok(())
    }

    pub fn set_current(&mut self, circuit_name: &str, current: f64) -> Result<()> {
        self.api
            .call_with_args("setcurrent", &[circuit_name.into(), current.into()])?;
        Ok(())
    }

    // Miscellaneous

    /// Build an asymptotic boundary of circular shells. Without a spec the
    /// engine picks every parameter itself.
    pub fn make_abc(&mut self, spec: Option<&AbcSpec>) -> Result<()> {
        match spec {
            None => self.api.call(Scope::Domain, "makeABC", &[])?,
            Some(spec) => {
                let edge = match spec.outer_edge {
                    OuterEdge::Dirichlet => 0,
                    OuterEdge::Neumann => 1,
                };
                self.api.call_with_args(
                    "makeABC",
                    &[
                        spec.shells.into(),
                        spec.radius.into(),
                        spec.center.x.into(),
                        spec.center.y.into(),
                        Arg::Int(edge),
                    ],
                )?
            }
        };
        Ok(())
    }
}
