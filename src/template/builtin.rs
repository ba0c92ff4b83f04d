//! Templates every registry created with [`TemplateRegistry::with_builtins`] starts with.
//!
//! [`TemplateRegistry::with_builtins`]: crate::TemplateRegistry::with_builtins

use crate::template::model::Template;
use crate::template::value::VariableKind;

const TEXT_REVEAL: &str = "  const textRef = createRef<Txt>();

  yield view.add(
    <Txt
      ref={textRef}
      text={ {{value}} }
      opacity={0}
      fontFamily={'Sans-Serif'}
      fontSize={40}
    />
  );

  yield* textRef().opacity(1, 1);";

const LOGO_ANIMATION: &str = "  const logoRef = createRef<Img>();

  yield view.add(
    <Img
      ref={logoRef}
      src={ {{logoUrl}} }
      width={200}
      height={200}
      scale={0}
      opacity={0}
    />
  );

  yield* all(
    logoRef().scale(1, 0.8),
    logoRef().opacity(1, 0.5),
  );

  yield* waitFor(1);";

const DATA_VISUALIZATION: &str = "  const data: {label: string; value: number}[] = {{data}};
  const chartHeight = {{chartHeight}};
  const maxValue = Math.max(...data.map((d) => d.value), 1);

  const containerRef = createRef<Layout>();
  yield view.add(<Layout ref={containerRef} layout direction=\"row\" gap={20} y={100} />);

  for (const item of data) {
    const barRef = createRef<Rect>();
    const labelRef = createRef<Txt>();
    containerRef().add(
      <Layout direction=\"column\" gap={10}>
        <Rect ref={barRef} width={60} height={0} fill={ {{barColor}} } radius={4} opacity={0} />
        <Txt ref={labelRef} text={item.label} fontSize={24} fill=\"#ffffff\" opacity={0} />
      </Layout>
    );
    yield* all(
      barRef().height((item.value / maxValue) * chartHeight, 0.8),
      barRef().opacity(1, 0.3),
      labelRef().opacity(1, 0.3),
    );
    yield* waitFor(0.2);
  }

  yield* waitFor(1);";

/// The built-in template set, in listing order.
pub(crate) fn builtin_templates() -> Vec<Template> {
    vec![
        Template::new("text-reveal", "Text Reveal Animation", TEXT_REVEAL)
            .description("Simple text reveal with fade-in animation")
            .tag("text")
            .tag("animation")
            .tag("reveal")
            .tag("fade")
            .variable("value", VariableKind::String, "The text to display"),
        Template::new("logo-animation", "Logo Animation", LOGO_ANIMATION)
            .description("Simple logo reveal with scale and fade animation")
            .tag("logo")
            .tag("animation")
            .tag("scale")
            .tag("fade")
            .variable("logoUrl", VariableKind::String, "URL of the logo image"),
        Template::new("data-visualization", "Bar Chart Animation", DATA_VISUALIZATION)
            .description("Animated bar chart with labels")
            .tag("data")
            .tag("chart")
            .tag("animation")
            .tag("bars")
            .variable(
                "data",
                VariableKind::Array,
                "Bars as {label, value} objects",
            )
            .variable("chartHeight", VariableKind::Number, "Height of the tallest bar")
            .variable("barColor", VariableKind::String, "Bar fill color"),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/template/builtin.rs"]
mod tests;
