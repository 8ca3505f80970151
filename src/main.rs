//! Sample generator: annotates a small logging abstraction and packages the
//! result. Serves as the executable the integration tests drive.

use extannot::expr::{format_string, not_null, some, Expr};
use extannot::{
    program, AssemblyDef, Metadata, MethodDef, NugetSpec, TypeDef, TypeRef, TypeUse,
};

fn object_array() -> TypeUse {
    TypeUse::named("System.Object[]")
}

fn string() -> TypeUse {
    TypeUse::named("System.String")
}

fn exception() -> TypeUse {
    TypeUse::named("System.Exception")
}

fn logging_metadata() -> Metadata {
    let levels = ["Debug", "Info", "Warn", "Error"];

    let mut logger = TypeDef::new("Sample.Logging", "ILogger");
    for level in levels {
        logger = logger
            .with_method(
                MethodDef::new(level)
                    .with_param("format", string())
                    .with_param("args", object_array()),
            )
            .with_method(
                MethodDef::new(level)
                    .with_param("exception", exception())
                    .with_param("format", string())
                    .with_param("args", object_array()),
            );
    }

    let factory = TypeDef::new("Sample.Logging", "ILoggerFactory").with_method(
        MethodDef::new("GetLogger").with_param("type", TypeUse::named("System.Type")),
    );

    Metadata::new(vec![AssemblyDef::new("Sample.Logging")
        .with_type(logger)
        .with_type(factory)])
}

fn main() -> anyhow::Result<()> {
    let spec = NugetSpec::new("Sample.Logging.Annotations")
        .with_title("Sample Logging Annotations")
        .with_authors("Sample Project")
        .with_description("External annotations for the Sample.Logging abstraction");

    program::run(spec, logging_metadata(), |annotator| {
        annotator.annotate_type(TypeRef::new("Sample.Logging.ILogger"), |t| {
            for level in ["Debug", "Info", "Warn", "Error"] {
                t.annotate(Expr::call(
                    level,
                    vec![format_string(), some(object_array())],
                ))?;
                t.annotate(Expr::call(
                    level,
                    vec![not_null(exception()), format_string(), some(object_array())],
                ))?;
            }
            Ok(())
        })?;

        annotator.annotate_type(TypeRef::new("Sample.Logging.ILoggerFactory"), |t| {
            t.annotate(Expr::eq(
                Expr::call("GetLogger", vec![not_null(TypeUse::named("System.Type"))]),
                not_null(TypeUse::named("Sample.Logging.ILogger")),
            ))
        })
    })
}
