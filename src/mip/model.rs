//! Mixed-integer linear model definition.

/// Handle to a variable of a [`MipModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Position of the variable in the model.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Integrality class of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// Any real value within bounds.
    Continuous,
    /// Integer values within bounds.
    Integer,
    /// 0 or 1.
    Binary,
}

/// A decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Display name.
    pub name: String,
    /// Finite lower bound.
    pub lower: f64,
    /// Upper bound, `f64::INFINITY` if unbounded.
    pub upper: f64,
    /// Integrality class.
    pub kind: VarKind,
}

impl Variable {
    /// Returns `true` for integer and binary variables.
    pub fn is_integral(&self) -> bool {
        matches!(self.kind, VarKind::Integer | VarKind::Binary)
    }
}

/// Relation between the left-hand side and the right-hand side of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `lhs <= rhs`
    LessEq,
    /// `lhs == rhs`
    Eq,
    /// `lhs >= rhs`
    GreaterEq,
}

/// A linear constraint `Σ coeff·var (sense) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// `(variable, coefficient)` terms; repeated variables are summed.
    pub terms: Vec<(VarId, f64)>,
    /// Relation to the right-hand side.
    pub sense: Sense,
    /// Right-hand side constant.
    pub rhs: f64,
}

/// A mixed-integer linear minimization model.
///
/// # Examples
///
/// ```
/// use u_tsp::mip::{MipModel, Sense};
///
/// let mut model = MipModel::new("knapsack");
/// let a = model.add_binary("a");
/// let b = model.add_binary("b");
/// model.add_constraint(vec![(a, 3.0), (b, 4.0)], Sense::LessEq, 5.0);
/// model.minimize(vec![(a, -2.0), (b, -3.0)]);
/// assert_eq!(model.num_vars(), 2);
/// assert_eq!(model.num_constraints(), 1);
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MipModel {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
    objective: Vec<(VarId, f64)>,
}

impl MipModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a variable and returns its handle.
    pub fn add_var(
        &mut self,
        name: impl Into<String>,
        lower: f64,
        upper: f64,
        kind: VarKind,
    ) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable {
            name: name.into(),
            lower,
            upper,
            kind,
        });
        id
    }

    /// Adds a 0/1 variable.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.add_var(name, 0.0, 1.0, VarKind::Binary)
    }

    /// Adds an integer variable in `[lower, upper]`.
    pub fn add_integer(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.add_var(name, lower, upper, VarKind::Integer)
    }

    /// Adds a continuous variable in `[lower, upper]`.
    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.add_var(name, lower, upper, VarKind::Continuous)
    }

    /// Adds a linear constraint.
    pub fn add_constraint(&mut self, terms: Vec<(VarId, f64)>, sense: Sense, rhs: f64) {
        self.constraints.push(LinearConstraint { terms, sense, rhs });
    }

    /// Sets the linear objective to minimize.
    pub fn minimize(&mut self, terms: Vec<(VarId, f64)>) {
        self.objective = terms;
    }

    /// All variables, indexed by [`VarId::index`].
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// All constraints.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Objective terms.
    pub fn objective(&self) -> &[(VarId, f64)] {
        &self.objective
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Dense objective coefficients.
    pub fn objective_coefficients(&self) -> Vec<f64> {
        let mut coeffs = vec![0.0; self.variables.len()];
        for &(var, c) in &self.objective {
            coeffs[var.index()] += c;
        }
        coeffs
    }

    /// Objective value of an assignment.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|&(var, c)| c * values[var.index()])
            .sum()
    }

    /// Returns `true` if `values` respects every bound, integrality
    /// requirement and constraint within `tol`.
    pub fn is_feasible(&self, values: &[f64], tol: f64) -> bool {
        if values.len() != self.variables.len() {
            return false;
        }
        let within_bounds = self.variables.iter().zip(values).all(|(var, &x)| {
            x.is_finite()
                && x >= var.lower - tol
                && x <= var.upper + tol
                && (!var.is_integral() || (x - x.round()).abs() <= tol)
        });
        within_bounds
            && self.constraints.iter().all(|c| {
                let lhs: f64 = c.terms.iter().map(|&(var, a)| a * values[var.index()]).sum();
                match c.sense {
                    Sense::LessEq => lhs <= c.rhs + tol,
                    Sense::GreaterEq => lhs >= c.rhs - tol,
                    Sense::Eq => (lhs - c.rhs).abs() <= tol,
                }
            })
    }

    /// Checks bounds, coefficients and variable references.
    pub fn validate(&self) -> Result<(), String> {
        for v in &self.variables {
            if !v.lower.is_finite() {
                return Err(format!("variable {} needs a finite lower bound", v.name));
            }
            if v.upper.is_nan() || v.upper < v.lower {
                return Err(format!(
                    "variable {} has empty domain [{}, {}]",
                    v.name, v.lower, v.upper
                ));
            }
        }
        let n = self.variables.len();
        let rows = self.constraints.iter().map(|c| (&c.terms, c.rhs));
        for (terms, rhs) in rows.chain(std::iter::once((&self.objective, 0.0))) {
            if !rhs.is_finite() {
                return Err("constraint right-hand side must be finite".into());
            }
            for &(var, c) in terms {
                if var.index() >= n {
                    return Err(format!("undefined variable index {}", var.index()));
                }
                if !c.is_finite() {
                    return Err(format!(
                        "coefficient of {} is not finite",
                        self.variables[var.index()].name
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_model() {
        let mut model = MipModel::new("m");
        let x = model.add_binary("x");
        let u = model.add_continuous("u", 1.0, 3.0);
        let k = model.add_integer("k", 0.0, f64::INFINITY);
        model.add_constraint(vec![(x, 1.0), (u, -1.0)], Sense::GreaterEq, -2.0);
        model.minimize(vec![(x, 2.0), (k, 1.0), (x, 1.0)]);
        assert_eq!(model.name(), "m");
        assert_eq!(model.objective_coefficients(), vec![3.0, 0.0, 1.0]);
        assert_eq!(model.objective_value(&[1.0, 2.0, 4.0]), 7.0);
        assert!(model.variables()[0].is_integral());
        assert!(!model.variables()[1].is_integral());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_is_feasible() {
        let mut model = MipModel::new("m");
        let x = model.add_binary("x");
        let u = model.add_continuous("u", 1.0, 3.0);
        model.add_constraint(vec![(x, 1.0), (u, 1.0)], Sense::LessEq, 3.0);
        assert!(model.is_feasible(&[1.0, 2.0], 1e-9));
        assert!(model.is_feasible(&[0.0, 2.5], 1e-9));
        assert!(!model.is_feasible(&[1.0, 2.5], 1e-9));
        assert!(!model.is_feasible(&[0.5, 1.0], 1e-9));
        assert!(!model.is_feasible(&[0.0, 0.0], 1e-9));
        assert!(!model.is_feasible(&[0.0], 1e-9));
    }

    #[test]
    fn test_validate_rejects_bad_bounds() {
        let mut model = MipModel::new("m");
        model.add_var("y", f64::NEG_INFINITY, 1.0, VarKind::Continuous);
        assert!(model.validate().is_err());

        let mut model = MipModel::new("m");
        model.add_var("y", 2.0, 1.0, VarKind::Integer);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_coefficient() {
        let mut model = MipModel::new("m");
        let x = model.add_binary("x");
        model.add_constraint(vec![(x, f64::NAN)], Sense::Eq, 1.0);
        assert!(model.validate().is_err());
    }
}
