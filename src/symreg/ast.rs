use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Sin,
    Cos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Arithmetic expression tree over a single variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    X,
    Const(f64),
    Unary {
        op: UnaryOp,
        child: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Expr::X => x,
            Expr::Const(value) => *value,
            Expr::Unary { op, child } => {
                let v = child.eval(x);
                match op {
                    UnaryOp::Neg => -v,
                    UnaryOp::Sin => v.sin(),
                    UnaryOp::Cos => v.cos(),
                }
            }
            Expr::Binary { op, left, right } => {
                let l = left.eval(x);
                let r = right.eval(x);
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    // Protected division: near-zero denominators yield 1.
                    BinaryOp::Div => {
                        if r.abs() < 1e-9 {
                            1.0
                        } else {
                            l / r
                        }
                    }
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Expr::X | Expr::Const(_) => 1,
            Expr::Unary { child, .. } => 1 + child.depth(),
            Expr::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn formula(&self) -> String {
        match self {
            Expr::X => "x".to_string(),
            Expr::Const(value) => format!("{value:.3}"),
            Expr::Unary { op, child } => match op {
                UnaryOp::Neg => format!("-({})", child.formula()),
                UnaryOp::Sin => format!("sin({})", child.formula()),
                UnaryOp::Cos => format!("cos({})", child.formula()),
            },
            Expr::Binary { op, left, right } => {
                let symbol = match op {
                    BinaryOp::Add => "+",
                    BinaryOp::Sub => "-",
                    BinaryOp::Mul => "*",
                    BinaryOp::Div => "/",
                };
                format!("({} {} {})", left.formula(), symbol, right.formula())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_division_yields_one() {
        let expr = Expr::Binary {
            op: BinaryOp::Div,
            left: Box::new(Expr::X),
            right: Box::new(Expr::Const(0.0)),
        };
        assert_eq!(expr.eval(5.0), 1.0);
    }

    #[test]
    fn formula_renders_nested_expressions() {
        let expr = Expr::Binary {
            op: BinaryOp::Mul,
            left: Box::new(Expr::X),
            right: Box::new(Expr::Unary {
                op: UnaryOp::Sin,
                child: Box::new(Expr::X),
            }),
        };
        assert_eq!(expr.formula(), "(x * sin(x))");
        assert_eq!(expr.depth(), 3);
    }
}
