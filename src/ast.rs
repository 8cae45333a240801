use std::rc::Rc;

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// `Expr` covers every syntactic construct: literals, variables, unary and
/// binary operations, function calls and definitions, arrays and matrices,
/// complex literals, unit-annotated values, conditionals, lambdas, derivative
/// requests, blocks and property access. Each variant carries the 1-based
/// source line of its introducing token for error reporting.
///
/// Nodes are immutable once built; trees may share subtrees (differentiation
/// reuses undifferentiated branches via `clone`) but never contain cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal such as `3.14`.
    Number {
        /// The literal value.
        value: f64,
        /// Line number in the source code.
        line:  usize,
    },
    /// A single-quoted string literal.
    String {
        /// The literal text, without the surrounding quotes.
        value: String,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable (or registered constant) by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation (addition, comparison, indexing, etc.).
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A unary operation. `Factorial` is the only postfix operator;
    /// `Plus` and `Negate` are prefix.
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A call expression such as `sin(x)` or `f(a, b)`.
    Call {
        /// Name of the function being called.
        name: String,
        /// Argument expressions.
        args: Vec<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// An assignment `target = value`. The evaluator requires `target` to be
    /// a bare [`Expr::Variable`].
    Assignment {
        /// The assignment target.
        target: Box<Self>,
        /// The value to bind.
        value:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// A named function definition `f(x, y) = body`. The `Rc` is shared with
    /// the environment binding created when the node is evaluated.
    FunctionDefinition(Rc<FunctionDef>),
    /// Array literal expression `[a, b, c]`.
    Array {
        /// Elements of the array.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Matrix literal expression `[[a, b], [c, d]]`.
    Matrix {
        /// Rows of the matrix.
        rows: Vec<Vec<Self>>,
        /// Line number in the source code.
        line: usize,
    },
    /// A complex number literal with real and imaginary part expressions.
    ComplexLiteral {
        /// Real part.
        real: Box<Self>,
        /// Imaginary part.
        imag: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A derivative request `d/dx expr`.
    Derivative {
        /// The differentiation variable.
        variable:   String,
        /// The expression to differentiate.
        expression: Box<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// A conditional, from either `cond ? a : b` or `if(cond, a, b)` /
    /// `if (cond) a else b`. Only the selected branch is evaluated.
    Conditional {
        /// The condition expression.
        condition: Box<Self>,
        /// Expression evaluated when the condition is true.
        then_expr: Box<Self>,
        /// Expression evaluated when the condition is false.
        else_expr: Box<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A lambda expression `->(x, y) body` producing a closure.
    Lambda {
        /// Parameter names.
        params: Vec<String>,
        /// The body expression.
        body:   Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// A value annotated with a unit expression, e.g. `60 km/h`.
    Unit {
        /// The wrapped value expression.
        value: Box<Self>,
        /// The unit expression text, e.g. `"km/h"`.
        unit:  String,
        /// Line number in the source code.
        line:  usize,
    },
    /// A block of statements; evaluates to its last statement's value.
    Block {
        /// Statements inside the block.
        statements: Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// Property access such as `z.real` or `q.unit` (chainable).
    PropertyAccess {
        /// The object expression.
        object:   Box<Self>,
        /// The property name.
        property: String,
        /// Line number in the source code.
        line:     usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    ///
    /// ## Example
    /// ```
    /// use calcora::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::Number { line, .. }
            | Self::String { line, .. }
            | Self::Variable { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::Call { line, .. }
            | Self::Assignment { line, .. }
            | Self::Array { line, .. }
            | Self::Matrix { line, .. }
            | Self::ComplexLiteral { line, .. }
            | Self::Derivative { line, .. }
            | Self::Conditional { line, .. }
            | Self::Lambda { line, .. }
            | Self::Unit { line, .. }
            | Self::Block { line, .. }
            | Self::PropertyAccess { line, .. } => *line,
            Self::FunctionDefinition(def) => def.line,
        }
    }

    /// Builds a number literal node. Used heavily by the differentiator when
    /// synthesizing derivative trees.
    #[must_use]
    pub const fn number(value: f64, line: usize) -> Self {
        Self::Number { value, line }
    }

}

/// Builds a binary operation node from already-owned operands.
#[must_use]
pub fn binary(op: BinaryOperator, left: Expr, right: Expr, line: usize) -> Expr {
    Expr::BinaryOp { left: Box::new(left),
                     op,
                     right: Box::new(right),
                     line }
}

/// Represents a user-defined function definition.
///
/// A function binds a list of parameter names to a body expression. The
/// definition doubles as a runtime value: evaluating the definition node
/// stores the shared `Rc<FunctionDef>` in the environment, so the body is
/// never cloned.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function.
    pub name:   String,
    /// The parameter names (e.g. `x`, `y`).
    pub params: Vec<String>,
    /// The body expression evaluated when the function is called.
    pub body:   Expr,
    /// Line number in the source code.
    pub line:   usize,
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic, comparisons, logical connectives and
/// the indexing operator `[]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Exponentiation (`^`)
    Pow,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
    /// Indexing (`a[i]`)
    Index,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Prefix plus (e.g. `+x`); passes numeric operands through.
    Plus,
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Postfix factorial (e.g. `5!`).
    Factorial,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Index, Less, LessEqual, Mul, NotEqual,
            Or, Pow, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Pow => "^",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            And => "&&",
            Or => "||",
            Index => "[]",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Plus => "+",
            Self::Negate => "-",
            Self::Factorial => "!",
        };
        write!(f, "{operator}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_builds_a_boxed_node() {
        let node = binary(BinaryOperator::Add,
                          Expr::number(1.0, 3),
                          Expr::number(2.0, 3),
                          3);

        assert_eq!(node,
                   Expr::BinaryOp { left:  Box::new(Expr::Number { value: 1.0, line: 3 }),
                                    op:    BinaryOperator::Add,
                                    right: Box::new(Expr::Number { value: 2.0, line: 3 }),
                                    line:  3 });
        assert_eq!(node.line_number(), 3);
    }
}
