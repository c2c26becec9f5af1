//! Export of the closed automaton as a Python model for the downstream solver.
//!
//! Purpose
//! - Declare one solver state per closed edge and face state, wire their
//!   boundaries, subdivisions and constraints, and seed the initial control
//!   point matrices.
//!
//! Layout of the script (in order)
//! - header and the vertex state `s`;
//! - edge states (declarations, then implementations with their subdivision
//!   matrices);
//! - face states, `init.subs`, boundaries, subdivisions, spaces, grids and
//!   primitives;
//! - boundary chaining of every face and the constraints of the initial
//!   adjacencies;
//! - control-point matrices of the initial faces;
//! - subdivision matrices of face states already stored in the library;
//! - automatic subdivision block (for the other face states) and footer.
//!
//! Library
//! - The footer saves the solver's subdivision matrices of every face state
//!   under `library/<name without spaces>/<i>` next to the script. When
//!   [`ExportCfg::library`] points at such a folder, face states found there
//!   load their matrices as variables and are not saved again.
//!
//! Cantor edges are exported with the classic rule only (no interior
//! control points).
//!
//! Edge identifiers are the edge tokens (`B3`, `C5_2`), face identifiers are
//! [`Face::ident`]; both are valid Python names.

mod bezier;

pub use bezier::{activation_columns, blossom, cantor_matrices, subdivision_matrix};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use nalgebra::DMatrix;

use crate::closure::Closure;
use crate::coords::FaceCoords;
use crate::edge::{Edge, EdgeKind};
use crate::face::{BezierDegree, Face};
use crate::structure::Structure;

/// Export options.
#[derive(Clone, Debug)]
pub struct ExportCfg {
    /// Emit the control-point matrices of the initial faces.
    pub planar_control_points: bool,
    /// Iterations of `autoSubBar` run by the solver on every face state.
    pub auto_subdivision_iters: u32,
    /// Folder of previously saved face matrices.
    pub library: Option<PathBuf>,
}

impl Default for ExportCfg {
    fn default() -> Self {
        Self {
            planar_control_points: true,
            auto_subdivision_iters: 0,
            library: None,
        }
    }
}

/// Library folder name of a face state: its name without spaces.
pub fn library_folder(face: &Face) -> String {
    face.name().replace('/', "--").replace(' ', "")
}

/// Render the solver script of `structure`.
///
/// `coords` are the assembled initial control points (see
/// [`crate::coords::assemble`]); without them the matrices are zero.
///
/// Fails only when a library folder of a face state exists but one of its
/// matrix files cannot be read.
pub fn render(
    structure: &Structure,
    coords: Option<&[FaceCoords]>,
    cfg: ExportCfg,
) -> io::Result<String> {
    let closure = structure.closure();
    let mut p = Printer {
        structure,
        closure: &closure,
        degree: structure.degree(),
        out: String::new(),
    };
    p.header();
    p.section("all edges states");
    for &e in closure.edges() {
        p.edge_decl(e);
    }
    p.section("all edges impl");
    for &e in closure.edges() {
        p.edge_impl(e);
    }
    p.cells();
    p.constraints();
    p.line("    ");
    p.section("control points");
    if cfg.planar_control_points {
        p.control_points(coords);
    }
    p.section("load matrices");
    let to_save = p.load_matrices(cfg.library.as_deref())?;
    p.auto_subdivision(cfg.auto_subdivision_iters, &to_save);
    p.footer();
    Ok(p.out)
}

/// Render the script of `structure` into `w`.
pub fn write_to<W: io::Write>(
    w: &mut W,
    structure: &Structure,
    coords: Option<&[FaceCoords]>,
    cfg: ExportCfg,
) -> io::Result<()> {
    w.write_all(render(structure, coords, cfg)?.as_bytes())
}

struct Printer<'a> {
    structure: &'a Structure,
    closure: &'a Closure,
    degree: BezierDegree,
    out: String,
}

fn num(x: f64) -> String {
    format!("{x:?}")
}

fn dict<I: IntoIterator<Item = String>>(entries: I) -> String {
    format!("{{{}}}", entries.into_iter().collect::<Vec<_>>().join(", "))
}

impl Printer<'_> {
    fn line(&mut self, s: impl AsRef<str>) {
        self.out.push_str(s.as_ref());
        self.out.push('\n');
    }

    fn section(&mut self, title: &str) {
        self.line("    ##############################");
        self.line(format!("    # {title}"));
    }

    fn header(&mut self) {
        for l in [
            "from __future__ import division",
            "import sys",
            "import os",
            "",
            "directory = os.path.realpath(__file__)",
            "directory = directory[:directory.find('InterfaceBCIFS')] + 'python'",
            "if directory not in sys.path:",
            "    sys.path.append(directory)",
            "from etat import *",
            "",
            "",
            "def modele():",
            "    init = EtatInit()",
            "    s = Etat('s', 1)",
            "    s.subs = {Sub('0'): s}",
            "    s.buildIntern()",
        ] {
            self.line(l);
        }
    }

    /// Solver dimension of an edge state and its point space.
    ///
    /// Only active Bezier edges carry interior points, matching
    /// [`BezierDegree::owned_points`].
    fn edge_space(&self, e: Edge) -> (u32, &'static str) {
        if !e.is_active_bezier() {
            return (0, "[Bord_('0'), Bord_('1')]");
        }
        match self.degree {
            BezierDegree::Quadratic => (1, "[Bord_('0'), Intern_(''), Bord_('1')]"),
            BezierDegree::Cubic => (2, "[Bord_('0'), Intern_('0'), Intern_('1'), Bord_('1')]"),
        }
    }

    fn interns(&self) -> &'static [&'static str] {
        match self.degree {
            BezierDegree::Quadratic => &["''"],
            BezierDegree::Cubic => &["'0'", "'1'"],
        }
    }

    fn edge_decl(&mut self, e: Edge) {
        let id = e.name();
        let (dim, _) = self.edge_space(e);
        self.line(format!("    {id} = Etat('{id}', {dim})"));
        self.line(format!("    {id}.bords = {{Bord('0'): s, Bord('1'): s}}"));
        self.line(format!("    {id}.permuts = {{Permut('0'): {id}}}"));
    }

    fn edge_impl(&mut self, e: Edge) {
        let id = e.name();
        let (_, space) = self.edge_space(e);
        let n = e.actual_subdivision_count() as usize;
        let subs = if e.is_delayed() {
            dict([format!("Sub('0'): {}", e.decreased_delay().name())])
        } else {
            dict((0..n).map(|i| format!("Sub('{i}'): {id}")))
        };
        self.line(format!("    {id}.subs = {subs}"));
        self.line(format!("    {id}.buildIntern()"));
        self.line(format!("    {id}.space = {space}"));
        self.line(format!("    {id}(Permut('0') + Bord('0'), Bord('1'))"));
        self.line(format!("    {id}(Permut('0') + Bord('1'), Bord('0'))"));
        if e.is_active_bezier() {
            match self.degree {
                BezierDegree::Quadratic => {
                    self.line(format!("    {id}(Permut('0') + Intern(''), Intern(''))"));
                }
                BezierDegree::Cubic => {
                    self.line(format!("    {id}(Permut('0') + Intern('0'), Intern('1'))"));
                    self.line(format!("    {id}(Permut('0') + Intern('1'), Intern('0'))"));
                }
            }
        }
        for i in 0..n {
            self.line(format!(
                "    {id}(Permut('0') + Sub('{i}'), Sub('{}') + Permut('0'))",
                n - i - 1
            ));
        }
        if e.is_delayed() || e.kind() == EdgeKind::Cantor {
            self.line(format!("    {id}(Bord('0') + Sub('0'), Sub('0') + Bord('0'))"));
            self.line(format!(
                "    {id}(Bord('1') + Sub('0'), Sub('{}') + Bord('1'))",
                n - 1
            ));
        }
        self.line(format!("    {id}.grid.elems = [Figure(1, {space})]"));
        if e.is_delayed() || e.is_bezier() {
            self.line(format!(
                "    {id}.prim.elems = [Figure(1, [Bord_('0'), Bord_('1')])]"
            ));
        }
        self.edge_matrices(e);
    }

    fn edge_matrices(&mut self, e: Edge) {
        let id = e.name();
        if e.is_delayed() {
            // The end points carry over through the `Bord + Sub` constraints.
            // The last delayed stage also places the interior points of its
            // active child.
            if e.is_bezier() && !e.decreased_delay().is_delayed() {
                let d = self.degree.interior_points() + 1;
                for (intern, col) in self.interns().iter().zip(activation_columns(d)) {
                    let target = format!("{id}.initMat[Sub_('0') + Intern({intern})]");
                    self.fmat(&target, &col, "Const");
                }
            }
            return;
        }
        let n = e.arity() as usize;
        match e.kind() {
            EdgeKind::Cantor => {
                for (target, m) in cantor_matrices(n) {
                    self.fmat(&format!("{id}.initMat[{target}]"), &m, "Const");
                }
            }
            EdgeKind::Bezier => {
                let d = self.degree.interior_points() + 1;
                for i in 0..n {
                    let m = subdivision_matrix(d, i, n);
                    self.fmat(&format!("{id}.initMat[Sub_('{i}')]"), &m, "Const");
                }
            }
        }
    }

    fn fmat(&mut self, target: &str, m: &DMatrix<f64>, typ: &str) {
        self.line(format!("    {target} = FMat(["));
        let rows: Vec<String> = m
            .row_iter()
            .map(|r| {
                let cells: Vec<String> = r.iter().map(|&x| num(x)).collect();
                format!("        [{}]", cells.join(", "))
            })
            .collect();
        let last = rows.len() - 1;
        for (i, r) in rows.into_iter().enumerate() {
            if i == last {
                self.line(format!("{r}]).setTyp('{typ}')"));
            } else {
                self.line(format!("{r},"));
            }
        }
    }

    fn cells(&mut self) {
        let closure = self.closure;
        let cells = closure.faces();
        self.section("all cells states");
        for c in cells {
            self.line(format!("    # {}", c.name()));
            self.line(format!("    {} = Etat('{}', 0)", c.ident(), c.name()));
        }

        self.section("subd of init");
        let init = dict(
            self.structure
                .faces()
                .iter()
                .enumerate()
                .map(|(i, f)| format!("Sub('{i}'): {}", f.ident())),
        );
        self.line(format!("    init.subs = {init}"));

        self.section("edges of all states");
        for c in cells {
            let bords = dict(
                c.edges()
                    .iter()
                    .enumerate()
                    .map(|(i, e)| format!("Bord('{i}'): {e}")),
            );
            self.line(format!("    {}.bords = {bords}", c.ident()));
        }

        self.section("subdivisions of all states");
        for (ci, c) in cells.iter().enumerate() {
            let subs = dict(
                closure
                    .children(ci)
                    .iter()
                    .enumerate()
                    .map(|(j, &k)| format!("Sub('{j}'): {}", cells[k].ident())),
            );
            self.line(format!("    {}.subs = {subs}", c.ident()));
        }

        self.section("build intern of all states");
        for c in cells {
            self.line(format!("    {}.buildIntern()", c.ident()));
        }

        self.section("spaces of all states");
        for c in cells {
            let space: Vec<String> = (0..c.len()).map(|i| format!("Bord_('{i}')")).collect();
            self.line(format!("    {}.space = [{}]", c.ident(), space.join(", ")));
        }

        self.section("grid of all states");
        for c in cells {
            self.line(format!("    {}.addGrid(Bord)", c.ident()));
        }

        self.section("prim of all states");
        for c in cells {
            self.cell_prim(c);
        }
    }

    fn cell_prim(&mut self, c: &Face) {
        self.line(format!("    {}.prim.elems = [Figure(2, [", c.ident()));
        for (i, e) in c.edges().iter().enumerate() {
            if !e.is_active_bezier() {
                self.line(format!("        Bord_('{i}') + Bord('0'),"));
                continue;
            }
            let n = e.arity();
            for j in 0..n {
                if n > 2 {
                    self.line(format!("        Bord_('{i}') + Sub('{j}') + Bord('0'),"));
                } else {
                    for k in 0..n {
                        self.line(format!(
                            "        Bord_('{i}') + Sub('{j}') + Sub('{k}') + Bord('0'),"
                        ));
                    }
                }
            }
        }
        self.line("    ])]");
    }

    fn constraints(&mut self) {
        self.section("constraints of all states");
        let closure = self.closure;
        for c in closure.faces() {
            self.line("    # edges adjacency constraints");
            let len = c.len();
            for i in 0..len {
                self.line(format!(
                    "    {}(Bord('{i}') + Bord('1'), Bord('{}') + Bord('0'))",
                    c.ident(),
                    (i + 1) % len
                ));
            }
        }
        self.line("    # constraints on init cells");
        let structure = self.structure;
        for a in structure.adjacencies() {
            self.line(format!(
                "    init(Sub('{}') + Bord('{}') + Permut('0'), Sub('{}') + Bord('{}'))",
                a.face1, a.edge1, a.face2, a.edge2
            ));
        }
    }

    fn control_points(&mut self, coords: Option<&[FaceCoords]>) {
        for fi in 0..self.structure.faces().len() {
            let n = self.structure.nb_control_points_of_face(fi);
            let mut m = DMatrix::zeros(4, n);
            if let Some(pts) = coords.and_then(|c| c.get(fi)) {
                for (j, p) in pts.iter().take(n).enumerate() {
                    m[(0, j)] = p.x;
                    m[(1, j)] = p.y;
                }
            }
            m.row_mut(3).fill(1.0);
            self.fmat(&format!("init.initMat[Sub_('{fi}')]"), &m, "Var");
            // z stays in the plane.
            self.line(format!("    for i in range(init.initMat[Sub_('{fi}')].n):"));
            self.line(format!("        init.initMat[Sub_('{fi}')][2, i].setTyp('Const')"));
            self.line("");
        }
    }

    /// Load stored subdivision matrices; returns the face states to save.
    fn load_matrices(&mut self, library: Option<&Path>) -> io::Result<Vec<usize>> {
        let closure = self.closure;
        let mut to_save = Vec::new();
        for (ci, c) in closure.faces().iter().enumerate() {
            let Some(folder) = library
                .map(|dir| dir.join(library_folder(c)))
                .filter(|f| f.is_dir())
            else {
                to_save.push(ci);
                continue;
            };
            for i in 0..closure.children(ci).len() {
                let path = folder.join(i.to_string());
                let content = fs::read_to_string(&path)
                    .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;
                self.line(format!(
                    "    {}.initMat[Sub_('{i}')] = FMat({}).setTyp('Var')",
                    c.ident(),
                    content.trim()
                ));
            }
        }
        Ok(to_save)
    }

    fn auto_subdivision(&mut self, iters: u32, to_save: &[usize]) {
        let closure = self.closure;
        let names: Vec<String> = to_save.iter().map(|&i| closure.faces()[i].ident()).collect();
        self.line("    ");
        self.section("auto subdivision points and save matrices");
        self.line(format!("    allCellsToSave = [{}]", names.join(", ")));
        self.line("    auto = Auto(init)");
        self.line("    auto.initDic()");
        self.line("    for etat in auto.figMax:");
        let mut targets = vec!["''".to_string()];
        targets.extend(names.iter().map(|n| format!("{n}.name")));
        self.line(format!(
            "        auto.autoSubBar(etat, {iters}, [{}])",
            targets.join(", ")
        ));
    }

    fn footer(&mut self) {
        for l in [
            "    # to save matrices of cells",
            "    for cell in allCellsToSave:",
            "        folderpath = cell.name.replace('/', '--')",
            "        folderpath = os.path.dirname(os.path.abspath(__file__)) + '/library/' + folderpath.replace(' ', '') + '/'",
            "        os.makedirs(folderpath, exist_ok=True)",
            "        for i in range(len(cell.subs)):",
            "            filepath = folderpath + str(i)",
            "            with open(filepath, 'w') as f:",
            "                f.write(str(cell.fm_[Sub(str(i))].tab))",
            "",
            "    return init",
            "",
            "",
            "if __name__ == '__main__':",
            "    print('modele()')",
            "    model_init = modele()",
            "    print('check()')",
            "    model_init.check()",
            "    print('solve()')",
            "    model_init.solve()",
            "    print('End')",
        ] {
            self.line(l);
        }
    }
}
