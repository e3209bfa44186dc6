//! Parser for JVM generic signatures (JVMS 4.7.9.1).
//!
//! Signatures are the compact strings the compiler records for generic
//! declarations, e.g. `Ljava/util/Map<TK;+Ljava/lang/Number;>;` for a field
//! or `<T:Ljava/lang/Object;>(TT;)TT;` for a method. Parsing produces a small
//! AST; translation into [`crate::TypeHandle`]s lives in `translate`.

use thiserror::Error;

use crate::PrimitiveType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("unexpected end of signature")]
    UnexpectedEnd,
    #[error("invalid signature: {0}")]
    Invalid(String),
}

type Result<T> = std::result::Result<T, SignatureError>;

/// A parameter or return type: a primitive or a reference type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSig {
    Base(PrimitiveType),
    Reference(RefTypeSig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTypeSig {
    Class(ClassTypeSig),
    /// `TT;` — a reference to a type variable named `T`.
    Variable(String),
    Array(Box<TypeSig>),
}

/// `Lpkg/Outer<...>.Inner<...>;` — one or more dot-separated segments.
///
/// The first segment's name is slash-qualified; the rest are simple names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSig {
    pub segments: Vec<ClassSigSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSigSegment {
    pub name: String,
    pub args: Vec<TypeArgSig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgSig {
    /// `*`
    Any,
    /// `+X`
    Extends(RefTypeSig),
    /// `-X`
    Super(RefTypeSig),
    /// `X`
    Exact(RefTypeSig),
}

/// `Name : ClassBound? ( : InterfaceBound )*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParamSig {
    pub name: String,
    pub class_bound: Option<RefTypeSig>,
    pub interface_bounds: Vec<RefTypeSig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSig {
    pub type_params: Vec<TypeParamSig>,
    pub super_class: ClassTypeSig,
    pub interfaces: Vec<ClassTypeSig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    pub type_params: Vec<TypeParamSig>,
    pub params: Vec<TypeSig>,
    /// `None` for `void`.
    pub result: Option<TypeSig>,
    pub throws: Vec<RefTypeSig>,
}

pub fn parse_field_signature(input: &str) -> Result<RefTypeSig> {
    let mut p = Parser::new(input);
    let sig = p.reference_type()?;
    p.finish()?;
    Ok(sig)
}

/// Like [`parse_field_signature`] but also accepts bare primitive
/// descriptors (`I`, `[Z`, ...), which non-generic members record instead of
/// a signature.
pub fn parse_type_signature(input: &str) -> Result<TypeSig> {
    let mut p = Parser::new(input);
    let sig = p.java_type()?;
    p.finish()?;
    Ok(sig)
}

pub fn parse_class_signature(input: &str) -> Result<ClassSig> {
    let mut p = Parser::new(input);
    let type_params = p.type_params_opt()?;
    let super_class = p.class_type()?;
    let mut interfaces = Vec::new();
    while !p.at_end() {
        interfaces.push(p.class_type()?);
    }
    Ok(ClassSig {
        type_params,
        super_class,
        interfaces,
    })
}

pub fn parse_method_signature(input: &str) -> Result<MethodSig> {
    let mut p = Parser::new(input);
    let type_params = p.type_params_opt()?;
    p.expect(b'(')?;
    let mut params = Vec::new();
    while p.peek()? != b')' {
        params.push(p.java_type()?);
    }
    p.expect(b')')?;
    let result = if p.peek()? == b'V' {
        p.bump();
        None
    } else {
        Some(p.java_type()?)
    };
    let mut throws = Vec::new();
    while !p.at_end() {
        p.expect(b'^')?;
        throws.push(p.reference_type()?);
    }
    Ok(MethodSig {
        type_params,
        params,
        result,
        throws,
    })
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Parser<'a> {
        Parser { input, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Result<u8> {
        self.input
            .as_bytes()
            .get(self.pos)
            .copied()
            .ok_or(SignatureError::UnexpectedEnd)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn expect(&mut self, c: u8) -> Result<()> {
        if self.peek()? != c {
            return Err(self.invalid());
        }
        self.bump();
        Ok(())
    }

    fn invalid(&self) -> SignatureError {
        SignatureError::Invalid(self.input.to_string())
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    /// Identifier: everything up to one of the JVMS-reserved delimiters.
    fn identifier(&mut self) -> Result<String> {
        let start = self.pos;
        while let Some(&b) = self.input.as_bytes().get(self.pos) {
            if matches!(b, b'.' | b';' | b'[' | b'/' | b'<' | b'>' | b':') {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.invalid());
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn java_type(&mut self) -> Result<TypeSig> {
        let b = self.peek()?;
        if let Some(prim) = PrimitiveType::from_descriptor(b as char) {
            self.bump();
            return Ok(TypeSig::Base(prim));
        }
        Ok(TypeSig::Reference(self.reference_type()?))
    }

    fn reference_type(&mut self) -> Result<RefTypeSig> {
        match self.peek()? {
            b'L' => Ok(RefTypeSig::Class(self.class_type()?)),
            b'T' => {
                self.bump();
                let name = self.identifier()?;
                self.expect(b';')?;
                Ok(RefTypeSig::Variable(name))
            }
            b'[' => {
                self.bump();
                Ok(RefTypeSig::Array(Box::new(self.java_type()?)))
            }
            _ => Err(self.invalid()),
        }
    }

    fn class_type(&mut self) -> Result<ClassTypeSig> {
        self.expect(b'L')?;
        let mut segments = Vec::new();
        // First segment: slash-qualified name, up to `<`, `.` or `;`.
        let mut name = self.identifier()?;
        while self.peek()? == b'/' {
            self.bump();
            name.push('/');
            name.push_str(&self.identifier()?);
        }
        segments.push(ClassSigSegment {
            name,
            args: self.type_args_opt()?,
        });
        while self.peek()? == b'.' {
            self.bump();
            let name = self.identifier()?;
            segments.push(ClassSigSegment {
                name,
                args: self.type_args_opt()?,
            });
        }
        self.expect(b';')?;
        Ok(ClassTypeSig { segments })
    }

    fn type_args_opt(&mut self) -> Result<Vec<TypeArgSig>> {
        if self.at_end() || self.peek()? != b'<' {
            return Ok(Vec::new());
        }
        self.bump();
        let mut args = Vec::new();
        loop {
            match self.peek()? {
                b'>' => {
                    self.bump();
                    break;
                }
                b'*' => {
                    self.bump();
                    args.push(TypeArgSig::Any);
                }
                b'+' => {
                    self.bump();
                    args.push(TypeArgSig::Extends(self.reference_type()?));
                }
                b'-' => {
                    self.bump();
                    args.push(TypeArgSig::Super(self.reference_type()?));
                }
                _ => args.push(TypeArgSig::Exact(self.reference_type()?)),
            }
        }
        if args.is_empty() {
            return Err(self.invalid());
        }
        Ok(args)
    }

    fn type_params_opt(&mut self) -> Result<Vec<TypeParamSig>> {
        if self.at_end() || self.peek()? != b'<' {
            return Ok(Vec::new());
        }
        self.bump();
        let mut params = Vec::new();
        loop {
            if self.peek()? == b'>' {
                self.bump();
                break;
            }
            let name = self.identifier()?;
            self.expect(b':')?;
            // The class bound may be empty (`<T::Ljava/io/Serializable;>`).
            let class_bound = match self.peek()? {
                b':' | b'>' => None,
                _ => Some(self.reference_type()?),
            };
            let mut interface_bounds = Vec::new();
            while self.peek()? == b':' {
                self.bump();
                interface_bounds.push(self.reference_type()?);
            }
            params.push(TypeParamSig {
                name,
                class_bound,
                interface_bounds,
            });
        }
        if params.is_empty() {
            return Err(self.invalid());
        }
        Ok(params)
    }
}
