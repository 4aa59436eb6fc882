//! Shared XML fixtures for the scenario tests.

/// A docbook-flavoured document with nested and mixed content.
pub const BASIC: &str = r#"<article>
  <someabstract>
    <para>This line contains something unusual</para>
  </someabstract>
  <someLicense>
    <para>This work is licensed under a <ulink url="http://creativecommons.org/licenses/by/4.0/legalcode"><citetitle>Creative Commons Attribution (CC-BY) 4.0 License</citetitle></ulink>.</para>
  </someLicense>
</article>"#;

/// The template-fitness document: every shape a template pipeline has to
/// cope with (pretty-printed mixed content, empty elements, CDATA, repeated
/// rows, inline links, deep single-child chains).
pub const FITNESS: &str = r#"<fitness>
  <Element1>
    <A>
      <child1>
        <child1_a>text</child1_a>
        <child1_b>text</child1_b>
      </child1>
      <child2>text</child2>
      <child3>example@email.org</child3>
    </A>
    <B>en</B>
    <empty/>
    <C>
      <para><![CDATA[Something a <bit> more unusual.]]></para>
    </C>
    <D>
      <D_child1>keywordA1</D_child1>
      <D_child1>keywordA2</D_child1>
      <D_child_source>ASFA</D_child_source>
    </D>
    <D>
      <D_child1>keywordB1</D_child1>
      <D_child_source>BSFA</D_child_source>
    </D>
    <E>
      <para>Start of sentence <ulink url="http://example.org/path"><Ee> Example link</Ee></ulink> and now there is the end of the sentence.</para>
    </E>
    <F>
      <F_child1>
        <F_child1_elements>
          <Elem1/>
        </F_child1_elements>
      </F_child1>
      <F_child1>
        <F_child1_elements>
          <Elem1/>
        </F_child1_elements>
      </F_child1>
    </F>
  </Element1>
</fitness>"#;
